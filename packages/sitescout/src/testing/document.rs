//! Scriptable mock document.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DocumentError, DocumentResult};
use crate::traits::{Document, ElementHandle};

/// Mock document with canned responses and call recording.
///
/// Evaluation results are keyed by a substring of the script; the first
/// configured pattern that matches wins. A separate table takes over once
/// any element has been clicked, so expansion before/after measurements
/// can differ.
///
/// # Example
///
/// ```rust
/// use sitescout::testing::MockDocument;
/// use serde_json::json;
///
/// let document = MockDocument::new()
///     .with_eval_result("document.title", json!("Staff Engineer"))
///     .with_element_text("h1", "Staff Engineer");
/// ```
#[derive(Default)]
pub struct MockDocument {
    eval: Arc<RwLock<Vec<(String, Value)>>>,
    eval_after_click: Arc<RwLock<Vec<(String, Value)>>>,
    elements: Arc<RwLock<HashMap<String, String>>>,
    content: Arc<RwLock<String>>,
    title: Arc<RwLock<String>>,
    fail_navigation: Arc<AtomicBool>,
    navigations: Arc<RwLock<Vec<String>>>,
    evaluations: Arc<RwLock<Vec<String>>>,
    clicks: Arc<RwLock<Vec<String>>>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Can an evaluation result for scripts containing `pattern`.
    pub fn with_eval_result(self, pattern: impl Into<String>, value: Value) -> Self {
        self.eval.write().unwrap().push((pattern.into(), value));
        self
    }

    /// Can an evaluation result used once any click has happened.
    pub fn with_eval_result_after_click(self, pattern: impl Into<String>, value: Value) -> Self {
        self.eval_after_click
            .write()
            .unwrap()
            .push((pattern.into(), value));
        self
    }

    /// Make a selector locatable, with the given text content.
    pub fn with_element_text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.elements
            .write()
            .unwrap()
            .insert(selector.into(), text.into());
        self
    }

    /// Set the document content.
    pub fn with_content(self, content: impl Into<String>) -> Self {
        *self.content.write().unwrap() = content.into();
        self
    }

    /// Set the document title.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        *self.title.write().unwrap() = title.into();
        self
    }

    /// Make every navigation fail.
    pub fn with_failing_navigation(self) -> Self {
        self.fail_navigation.store(true, Ordering::SeqCst);
        self
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.read().unwrap().len()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().unwrap().clone()
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.read().unwrap().len()
    }

    pub fn click_count(&self) -> usize {
        self.clicks.read().unwrap().len()
    }

    pub fn clicked_selectors(&self) -> Vec<String> {
        self.clicks.read().unwrap().clone()
    }

    fn lookup(&self, table: &RwLock<Vec<(String, Value)>>, script: &str) -> Option<Value> {
        table
            .read()
            .unwrap()
            .iter()
            .find(|(pattern, _)| script.contains(pattern.as_str()))
            .map(|(_, value)| value.clone())
    }
}

impl Clone for MockDocument {
    fn clone(&self) -> Self {
        Self {
            eval: Arc::clone(&self.eval),
            eval_after_click: Arc::clone(&self.eval_after_click),
            elements: Arc::clone(&self.elements),
            content: Arc::clone(&self.content),
            title: Arc::clone(&self.title),
            fail_navigation: Arc::clone(&self.fail_navigation),
            navigations: Arc::clone(&self.navigations),
            evaluations: Arc::clone(&self.evaluations),
            clicks: Arc::clone(&self.clicks),
        }
    }
}

#[async_trait]
impl Document for MockDocument {
    async fn navigate(&self, url: &str, _timeout: Duration) -> DocumentResult<()> {
        self.navigations.write().unwrap().push(url.to_string());
        if self.fail_navigation.load(Ordering::SeqCst) {
            return Err(DocumentError::Navigation {
                url: url.to_string(),
            });
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> DocumentResult<Value> {
        self.evaluations.write().unwrap().push(script.to_string());

        if self.click_count() > 0 {
            if let Some(value) = self.lookup(&self.eval_after_click, script) {
                return Ok(value);
            }
        }
        self.lookup(&self.eval, script)
            .ok_or_else(|| DocumentError::Eval {
                reason: format!("no canned result for script: {script}"),
            })
    }

    async fn locate_and_wait(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> DocumentResult<ElementHandle> {
        if self.elements.read().unwrap().contains_key(selector) {
            Ok(ElementHandle::new(selector, format!("mock-{selector}")))
        } else {
            Err(DocumentError::NotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn click(&self, element: &ElementHandle) -> DocumentResult<()> {
        self.clicks.write().unwrap().push(element.selector.clone());
        Ok(())
    }

    async fn text_content(&self, element: &ElementHandle) -> DocumentResult<String> {
        self.elements
            .read()
            .unwrap()
            .get(&element.selector)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound {
                selector: element.selector.clone(),
            })
    }

    async fn content(&self) -> DocumentResult<String> {
        Ok(self.content.read().unwrap().clone())
    }

    async fn title(&self) -> DocumentResult<String> {
        Ok(self.title.read().unwrap().clone())
    }
}
