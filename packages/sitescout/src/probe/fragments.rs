//! Bounded HTML fragment capture for verified fields.

use indexmap::IndexMap;

use crate::probe::catalog;
use crate::traits::Document;
use crate::types::discovery::FRAGMENT_CAP;
use crate::types::strategy::Field;

/// Capture an HTML fragment for every field that has a working strategy.
///
/// Fragments are capped at [`FRAGMENT_CAP`] characters. Capture failures
/// are absorbed per field.
pub async fn capture_fragments(
    document: &dyn Document,
    verified_fields: &[Field],
) -> IndexMap<Field, String> {
    let mut fragments = IndexMap::new();

    for &field in verified_fields {
        match document.evaluate(&catalog::fragment_script(field)).await {
            Ok(value) => {
                if let Some(html) = value.as_str() {
                    if !html.is_empty() {
                        fragments.insert(field, html.chars().take(FRAGMENT_CAP).collect());
                        tracing::debug!(field = %field, length = html.len(), "captured fragment");
                    }
                }
            }
            Err(e) => {
                tracing::debug!(field = %field, error = %e, "fragment capture failed");
            }
        }
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn captures_only_requested_fields() {
        let document = MockDocument::new()
            .with_eval_result("outerHTML", json!("<h1>Staff Engineer</h1>"));

        let fragments = capture_fragments(&document, &[Field::Title]).await;
        assert_eq!(
            fragments.get(&Field::Title).map(String::as_str),
            Some("<h1>Staff Engineer</h1>")
        );
        assert_eq!(fragments.len(), 1);
    }

    #[tokio::test]
    async fn fragments_are_capped() {
        let big = format!("<div>{}</div>", "x".repeat(2000));
        let document = MockDocument::new().with_eval_result("outerHTML", Value::String(big));

        let fragments = capture_fragments(&document, &[Field::Description]).await;
        assert_eq!(fragments.get(&Field::Description).unwrap().len(), FRAGMENT_CAP);
    }

    #[tokio::test]
    async fn missing_element_yields_no_fragment() {
        let document = MockDocument::new().with_eval_result("outerHTML", Value::Null);
        let fragments = capture_fragments(&document, &[Field::Title]).await;
        assert!(fragments.is_empty());
    }
}
