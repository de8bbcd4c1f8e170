//! Strategy prober: tests ranked extraction approaches per field against a
//! live document.
//!
//! Every attempt is independently guarded — a timeout, an empty result or a
//! transport failure is discarded locally and never aborts the probe.

use std::time::Duration;

use serde_json::Value;

use crate::probe::catalog;
use crate::traits::Document;
use crate::types::config::ScoutConfig;
use crate::types::strategy::{
    rank_by_confidence, Field, FieldStrategyResult, StrategyKind, MIN_SAMPLE_LEN,
};

/// Probe one field, returning working strategies ordered by confidence
/// descending (discovery order within a tier).
pub async fn probe_field(
    document: &dyn Document,
    field: Field,
    config: &ScoutConfig,
) -> Vec<FieldStrategyResult> {
    let mut results = Vec::new();

    // Scripted evaluation first: atomic, single-context, preferred.
    let expr = catalog::eval_expression(field);
    match document.evaluate(&catalog::wrap_expression(expr)).await {
        Ok(value) => {
            if let Some(text) = value_text(&value) {
                if text.trim().len() > MIN_SAMPLE_LEN {
                    results.push(FieldStrategyResult::working(
                        field,
                        StrategyKind::JsEvaluation,
                        expr,
                        &text,
                    ));
                    tracing::debug!(field = %field, length = text.len(), "evaluation strategy works");
                }
            }
        }
        Err(e) => {
            tracing::debug!(field = %field, error = %e, "evaluation strategy failed");
        }
    }

    // Structured-query fallbacks.
    let timeout = Duration::from_millis(config.locator_probe_timeout_ms);
    for selector in catalog::fallback_selectors(field) {
        let element = match document.locate_and_wait(selector, timeout).await {
            Ok(element) => element,
            Err(e) => {
                tracing::debug!(field = %field, selector, error = %e, "locator did not resolve");
                continue;
            }
        };
        let text = match document.text_content(&element).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(field = %field, selector, error = %e, "text read failed");
                continue;
            }
        };
        if text.trim().len() > MIN_SAMPLE_LEN {
            results.push(FieldStrategyResult::working(
                field,
                StrategyKind::CssSelector,
                *selector,
                &text,
            ));
            tracing::debug!(field = %field, selector, length = text.len(), "selector strategy works");
        }
    }

    rank_by_confidence(&mut results);
    results
}

/// Render an evaluation result as text. `Null` means the expression
/// resolved to nothing.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;
    use crate::types::strategy::Confidence;

    #[tokio::test]
    async fn evaluation_result_ranks_first() {
        let document = MockDocument::new()
            .with_eval_result("querySelector('h1')", Value::String("Engineering Manager, API Product".into()))
            .with_element_text("h1", "Engineering Manager, API Product");

        let results = probe_field(&document, Field::Title, &ScoutConfig::default()).await;

        assert!(!results.is_empty());
        assert_eq!(results[0].kind, StrategyKind::JsEvaluation);
        assert!(results[0].success);
    }

    #[tokio::test]
    async fn short_samples_are_discarded() {
        let document = MockDocument::new()
            .with_eval_result("querySelector('h1')", Value::String("stub".into()));

        let results = probe_field(&document, Field::Title, &ScoutConfig::default()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn failures_never_escape_the_probe() {
        // No canned responses at all: every attempt fails locally.
        let document = MockDocument::new();
        let results = probe_field(&document, Field::Description, &ScoutConfig::default()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn long_evaluation_sample_is_high_confidence() {
        let long = "Responsible for the API platform team. ".repeat(5);
        let document = MockDocument::new()
            .with_eval_result("show-more-less-html__markup", Value::String(long.clone()));

        let results = probe_field(&document, Field::Description, &ScoutConfig::default()).await;
        assert_eq!(results[0].confidence, Confidence::High);
        assert_eq!(results[0].length, long.len());
    }
}
