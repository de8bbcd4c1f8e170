//! Code-synthesis oracle capability.
//!
//! The oracle converts structured requests into source text or narrative
//! JSON. It gives no well-formedness guarantee; callers parse defensively
//! (fenced block → whole-text parse → structured fallback).

use async_trait::async_trait;

use crate::error::Result;

/// External capability converting prompts into text.
///
/// Implementations wrap a live LLM provider ([`crate::oracles::RigOracle`])
/// or a deterministic queue of canned responses
/// ([`crate::testing::MockOracle`]), so tests never invoke a live model.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Complete a prompt under a system preamble.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
