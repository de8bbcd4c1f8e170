//! Document-access capability.
//!
//! The browser-automation engine is an external collaborator; this trait is
//! the seam the probers and the discovery orchestrator talk through.
//! Implementations wrap a live rendering service ([`crate::browsers::RemoteDocument`])
//! or canned state for tests ([`crate::testing::MockDocument`]).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DocumentResult;

/// Opaque handle to a located element, usable for one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Selector the element was located with.
    pub selector: String,

    /// Implementation-scoped element id.
    pub id: String,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            id: id.into(),
        }
    }
}

/// A live, remotely rendered document.
///
/// All operations are suspension points; no two operations should run
/// concurrently against the same handle — probing is strictly ordered to
/// avoid racing document mutations.
#[async_trait]
pub trait Document: Send + Sync {
    /// Navigate to a URL and wait for the document to be ready.
    async fn navigate(&self, url: &str, timeout: Duration) -> DocumentResult<()>;

    /// Evaluate a JavaScript expression in the document context.
    ///
    /// Returns the JSON-serialized result; `Value::Null` when the
    /// expression resolved to nothing.
    async fn evaluate(&self, script: &str) -> DocumentResult<Value>;

    /// Wait for a selector to resolve to an element.
    async fn locate_and_wait(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> DocumentResult<ElementHandle>;

    /// Click a previously located element.
    async fn click(&self, element: &ElementHandle) -> DocumentResult<()>;

    /// Text content of a previously located element.
    async fn text_content(&self, element: &ElementHandle) -> DocumentResult<String>;

    /// Full text content of the document.
    async fn content(&self) -> DocumentResult<String>;

    /// Document title.
    async fn title(&self) -> DocumentResult<String>;
}
