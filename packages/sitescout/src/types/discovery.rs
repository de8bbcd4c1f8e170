//! Discovery record: the persisted, structured output of one probing run.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sites::SiteId;
use crate::types::strategy::{Confidence, Field, FieldStrategyResult, StrategyKind};

/// Schema version stamped into every persisted record.
pub const RECORD_SCHEMA_VERSION: &str = "2.0";

/// Captured HTML fragments are truncated to this many characters.
pub const FRAGMENT_CAP: usize = 500;

/// Result of probing content-expansion affordances.
///
/// `needed = false` means no trigger fired, or clicking one did not change
/// the measured content length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionStrategy {
    /// Whether expansion is required before extraction.
    pub needed: bool,

    /// The trigger that was clicked, when one fired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Content length before the click (0 when the baseline element is missing).
    #[serde(default)]
    pub before_length: usize,

    /// Content length after the click and settle wait.
    #[serde(default)]
    pub after_length: usize,

    /// Human-readable summary of the measured delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

impl InteractionStrategy {
    /// No expansion required.
    pub fn not_needed(before_length: usize) -> Self {
        Self {
            needed: false,
            before_length,
            after_length: before_length,
            ..Default::default()
        }
    }
}

/// Wait durations recommended by discovery, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitHints {
    /// Wait after page load for dynamic content.
    pub initial_load_ms: u64,

    /// Wait after dismissing a modal, when one is present.
    pub after_modal_ms: u64,

    /// Wait after triggering content expansion.
    pub expansion_ms: u64,
}

impl Default for WaitHints {
    fn default() -> Self {
        Self {
            initial_load_ms: 3_000,
            after_modal_ms: 1_000,
            expansion_ms: 1_500,
        }
    }
}

/// Persisted output of one probing run against one document.
///
/// Immutable once persisted. The strategy lists are ordered by confidence
/// descending; the oracle narrative (observations, edge cases, wait hints)
/// is layered on top of the verified evidence and never overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    /// Record identifier extracted from the URL.
    pub record_id: String,

    /// URL the discovery ran against.
    pub url: String,

    /// Clean URL without tracking parameters.
    pub canonical_url: String,

    /// Family this record belongs to.
    pub site: SiteId,

    /// Verified strategies per field, confidence-descending.
    pub strategies: IndexMap<Field, Vec<FieldStrategyResult>>,

    /// Content-expansion strategy.
    pub interaction: InteractionStrategy,

    /// Bounded HTML fragments for fields with at least one working strategy.
    #[serde(default)]
    pub html_fragments: IndexMap<Field, String>,

    /// Free-text observations from the oracle narrative.
    #[serde(default)]
    pub observations: Vec<String>,

    /// Edge cases and quirks noted by the oracle narrative.
    #[serde(default)]
    pub edge_cases: Vec<String>,

    /// Recommended wait durations.
    #[serde(default)]
    pub wait_hints: WaitHints,

    /// True when no field has a working strategy. Partial discovery
    /// retains value for post-mortem inspection.
    #[serde(default)]
    pub low_quality: bool,

    /// When the discovery ran.
    pub timestamp: DateTime<Utc>,

    /// Schema version of this record.
    pub schema_version: String,
}

impl DiscoveryRecord {
    /// True when at least one field has a working strategy.
    pub fn has_working_strategies(&self) -> bool {
        self.strategies.values().any(|list| !list.is_empty())
    }

    /// Best strategy for a field: the head of its confidence-ordered list.
    pub fn best_strategy(&self, field: Field) -> Option<&FieldStrategyResult> {
        self.strategies.get(&field).and_then(|list| list.first())
    }

    /// Scripted-evaluation code per field, preferring high confidence.
    ///
    /// Falls back to any scripted evaluation when no high-confidence one
    /// exists for a field. Fields with only structured-query strategies are
    /// absent from the result.
    pub fn scripted_strategies(&self) -> IndexMap<Field, String> {
        let mut out = IndexMap::new();
        for (field, list) in &self.strategies {
            let preferred = list
                .iter()
                .find(|s| s.kind == StrategyKind::JsEvaluation && s.confidence == Confidence::High)
                .or_else(|| list.iter().find(|s| s.kind == StrategyKind::JsEvaluation));
            if let Some(strategy) = preferred {
                out.insert(*field, strategy.code.clone());
            }
        }
        out
    }
}
