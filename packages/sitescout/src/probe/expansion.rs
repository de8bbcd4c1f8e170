//! Interaction prober: detects and exercises content-expansion
//! affordances, measuring the content-size delta to decide necessity.

use std::time::Duration;

use crate::probe::catalog;
use crate::traits::Document;
use crate::types::config::ScoutConfig;
use crate::types::discovery::InteractionStrategy;

/// Probe for a content-expansion affordance.
///
/// Measures the baseline container length (0 when the container is missing
/// — never an error), clicks the first actionable trigger, waits the settle
/// duration and re-measures. Expansion is only reported as needed when the
/// click actually grew the content.
pub async fn probe_expansion(
    document: &dyn Document,
    config: &ScoutConfig,
) -> InteractionStrategy {
    let length_script = catalog::container_length_script();

    let before = match document.evaluate(&length_script).await {
        Ok(value) => value.as_u64().unwrap_or(0) as usize,
        Err(e) => {
            tracing::debug!(error = %e, "baseline measurement failed");
            return InteractionStrategy::not_needed(0);
        }
    };

    let timeout = Duration::from_millis(config.trigger_probe_timeout_ms);
    let mut clicked: Option<&str> = None;

    for trigger in catalog::EXPANSION_TRIGGERS {
        match document.locate_and_wait(trigger, timeout).await {
            Ok(element) => match document.click(&element).await {
                Ok(()) => {
                    tracing::debug!(trigger, "clicked expansion trigger");
                    clicked = Some(trigger);
                    break;
                }
                Err(e) => {
                    tracing::debug!(trigger, error = %e, "click failed");
                }
            },
            Err(_) => continue,
        }
    }

    let Some(trigger) = clicked else {
        return InteractionStrategy::not_needed(before);
    };

    tokio::time::sleep(Duration::from_millis(config.expansion_settle_ms)).await;

    let after = match document.evaluate(&length_script).await {
        Ok(value) => value.as_u64().unwrap_or(0) as usize,
        Err(_) => before,
    };

    if after == before {
        // The trigger fired but changed nothing; extraction can skip it.
        return InteractionStrategy::not_needed(before);
    }

    InteractionStrategy {
        needed: true,
        selector: Some(trigger.to_string()),
        before_length: before,
        after_length: after,
        impact: Some(format!(
            "{before} -> {after} chars ({:+})",
            after as i64 - before as i64
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDocument;
    use serde_json::json;

    fn fast_config() -> ScoutConfig {
        ScoutConfig {
            expansion_settle_ms: 1,
            ..ScoutConfig::default()
        }
    }

    #[tokio::test]
    async fn no_trigger_means_not_needed() {
        let document = MockDocument::new().with_eval_result("textContent.length", json!(800));

        let strategy = probe_expansion(&document, &ScoutConfig::default()).await;
        assert!(!strategy.needed);
        assert_eq!(strategy.before_length, 800);
    }

    #[tokio::test]
    async fn unchanged_length_means_not_needed() {
        let document = MockDocument::new()
            .with_eval_result("textContent.length", json!(800))
            .with_eval_result_after_click("textContent.length", json!(800))
            .with_element_text("button[aria-expanded='false']", "Show more");

        let strategy = probe_expansion(&document, &fast_config()).await;
        assert!(!strategy.needed);
        assert_eq!(document.click_count(), 1);
    }

    #[tokio::test]
    async fn growing_content_reports_needed() {
        let document = MockDocument::new()
            .with_eval_result("textContent.length", json!(300))
            .with_eval_result_after_click("textContent.length", json!(2400))
            .with_element_text("button[aria-expanded='false']", "Show more");

        let strategy = probe_expansion(&document, &fast_config()).await;
        assert!(strategy.needed);
        assert_eq!(strategy.selector.as_deref(), Some("button[aria-expanded='false']"));
        assert_eq!(strategy.before_length, 300);
        assert_eq!(strategy.after_length, 2400);
        assert_eq!(strategy.impact.as_deref(), Some("300 -> 2400 chars (+2100)"));
    }

    #[tokio::test]
    async fn missing_baseline_never_fails() {
        // No canned evaluation at all: the measurement itself errors.
        let document = MockDocument::new();
        let strategy = probe_expansion(&document, &ScoutConfig::default()).await;
        assert!(!strategy.needed);
        assert_eq!(strategy.before_length, 0);
    }
}
