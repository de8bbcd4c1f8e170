//! Oracle narrative annotation over verified probe evidence.
//!
//! The oracle gives no well-formedness guarantee, so parsing is defensive:
//! fenced JSON block first, then the whole response as JSON, then a raw
//! text fallback that keeps the response as a single observation.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::sites::SiteProfile;
use crate::types::discovery::{InteractionStrategy, WaitHints};
use crate::types::strategy::{Field, FieldStrategyResult};

/// Narrative produced by the oracle, layered on top of verified evidence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub observations: Vec<String>,
    pub edge_cases: Vec<String>,
    pub wait_hints: Option<WaitHints>,
}

#[derive(Deserialize)]
struct RawAnnotation {
    #[serde(default)]
    observations: Vec<String>,
    #[serde(default)]
    edge_cases: Vec<String>,
    #[serde(default)]
    recommended_wait_times: Option<RawWaitTimes>,
}

#[derive(Deserialize)]
struct RawWaitTimes {
    #[serde(default = "default_initial_load")]
    initial_load_ms: u64,
    #[serde(default = "default_after_modal")]
    after_modal_ms: u64,
    #[serde(default = "default_expansion")]
    expansion_ms: u64,
}

fn default_initial_load() -> u64 {
    WaitHints::default().initial_load_ms
}

fn default_after_modal() -> u64 {
    WaitHints::default().after_modal_ms
}

fn default_expansion() -> u64 {
    WaitHints::default().expansion_ms
}

impl From<RawWaitTimes> for WaitHints {
    fn from(raw: RawWaitTimes) -> Self {
        Self {
            initial_load_ms: raw.initial_load_ms,
            after_modal_ms: raw.after_modal_ms,
            expansion_ms: raw.expansion_ms,
        }
    }
}

/// Build the annotation request from verified evidence only.
///
/// Pure: the orchestrator stays free of text-formatting concerns.
pub fn build_annotation_prompt(
    profile: &SiteProfile,
    strategies: &IndexMap<Field, Vec<FieldStrategyResult>>,
    interaction: &InteractionStrategy,
    fragments: &IndexMap<Field, String>,
    modal_present: bool,
) -> String {
    let strategies_json = serde_json::to_string_pretty(&json!(strategies)).unwrap_or_default();
    let interaction_json = serde_json::to_string_pretty(&json!(interaction)).unwrap_or_default();

    let mut fragment_section = String::new();
    for (field, html) in fragments {
        let excerpt: String = html.chars().take(300).collect();
        fragment_section.push_str(&format!("{field} area: {excerpt}\n"));
    }
    if fragment_section.is_empty() {
        fragment_section.push_str("(no fragments captured)\n");
    }

    format!(
        "Analyze this {display_name} job posting.\n\n\
         These extraction strategies were TESTED against the live page and WORK:\n\n\
         {strategies_json}\n\n\
         Content expansion strategy (measured):\n\
         {interaction_json}\n\n\
         HTML samples from the page:\n\
         {fragment_section}\n\
         Modal dialog present: {modal_present}\n\n\
         Based on these TESTED and VERIFIED strategies, document the scraping approach.\n\
         CRITICAL: Prioritize strategies marked with \"confidence\": \"high\".\n\
         CRITICAL: Describe only the verified strategies above.\n\
         Note: {description}\n\n\
         Output your analysis as the specified JSON structure.",
        display_name = profile.display_name,
        description = profile.description,
    )
}

/// Parse the oracle response defensively.
pub fn parse_annotation(response: &str) -> Annotation {
    if let Some(json_text) = extract_fenced_json(response) {
        if let Ok(raw) = serde_json::from_str::<RawAnnotation>(&json_text) {
            return raw.into();
        }
    }
    if let Ok(raw) = serde_json::from_str::<RawAnnotation>(response.trim()) {
        return raw.into();
    }

    // Structured fallback: keep the raw narrative for post-mortem value.
    Annotation {
        observations: vec![response.trim().to_string()],
        edge_cases: vec![],
        wait_hints: None,
    }
}

impl From<RawAnnotation> for Annotation {
    fn from(raw: RawAnnotation) -> Self {
        Self {
            observations: raw.observations,
            edge_cases: raw.edge_cases,
            wait_hints: raw.recommended_wait_times.map(WaitHints::from),
        }
    }
}

/// Extract the first fenced JSON object from a response.
fn extract_fenced_json(response: &str) -> Option<String> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("static fence pattern");
    fence
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{SiteId, SiteRegistry};

    #[test]
    fn parses_fenced_json() {
        let response = r#"Here is my analysis:
```json
{
  "observations": ["h1 holds the title"],
  "edge_cases": ["description needs expansion"],
  "recommended_wait_times": {"initial_load_ms": 4000, "after_modal_ms": 1000, "expansion_ms": 2000}
}
```
Done."#;

        let annotation = parse_annotation(response);
        assert_eq!(annotation.observations, vec!["h1 holds the title"]);
        assert_eq!(annotation.edge_cases, vec!["description needs expansion"]);
        assert_eq!(annotation.wait_hints.unwrap().initial_load_ms, 4000);
    }

    #[test]
    fn parses_bare_json() {
        let response = r#"{"observations": ["obs"], "edge_cases": []}"#;
        let annotation = parse_annotation(response);
        assert_eq!(annotation.observations, vec!["obs"]);
        assert!(annotation.wait_hints.is_none());
    }

    #[test]
    fn falls_back_to_raw_text() {
        let response = "The page looks like a standard job posting.";
        let annotation = parse_annotation(response);
        assert_eq!(annotation.observations, vec![response.to_string()]);
        assert!(annotation.edge_cases.is_empty());
    }

    #[test]
    fn partial_wait_times_get_defaults() {
        let response = r#"{"observations": [], "recommended_wait_times": {"initial_load_ms": 5000}}"#;
        let annotation = parse_annotation(response);
        let hints = annotation.wait_hints.unwrap();
        assert_eq!(hints.initial_load_ms, 5000);
        assert_eq!(hints.expansion_ms, 1500);
    }

    #[test]
    fn prompt_embeds_verified_evidence_only() {
        let registry = SiteRegistry::with_defaults();
        let profile = registry.get(SiteId::LinkedIn);
        let mut strategies = IndexMap::new();
        strategies.insert(
            Field::Title,
            vec![FieldStrategyResult::working(
                Field::Title,
                crate::types::strategy::StrategyKind::JsEvaluation,
                "document.querySelector('h1')?.textContent",
                "Engineering Manager, API Product",
            )],
        );

        let prompt = build_annotation_prompt(
            profile,
            &strategies,
            &InteractionStrategy::not_needed(100),
            &IndexMap::new(),
            false,
        );

        assert!(prompt.contains("LinkedIn"));
        assert!(prompt.contains("document.querySelector('h1')?.textContent"));
        assert!(prompt.contains("TESTED"));
        assert!(prompt.contains("(no fragments captured)"));
    }
}
