//! Field extraction strategies and their confidence ranking.

use serde::{Deserialize, Serialize};

/// Minimum sample length for a probe attempt to count as working.
///
/// Excludes empty and placeholder nodes ("...", "N/A").
pub const MIN_SAMPLE_LEN: usize = 10;

/// Captured sample text is truncated to this many characters.
pub const SAMPLE_CAP: usize = 200;

/// A scripted evaluation yielding more than this is high confidence.
pub const EVAL_HIGH_CONFIDENCE_LEN: usize = 100;

/// A structured query yielding more than this is medium confidence.
pub const QUERY_MEDIUM_CONFIDENCE_LEN: usize = 50;

/// A field extracted from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Company,
    Location,
    Description,
}

impl Field {
    /// All tracked fields, in probe order.
    pub const ALL: [Field; 4] = [
        Field::Title,
        Field::Company,
        Field::Location,
        Field::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Company => "company",
            Field::Location => "location",
            Field::Description => "description",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a strategy extracts its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// One JavaScript expression evaluated in the document context.
    /// Atomic and preferred.
    #[serde(rename = "javascript_evaluation")]
    JsEvaluation,

    /// A CSS selector resolved through the locator API. Fallback.
    #[serde(rename = "css_selector")]
    CssSelector,
}

/// Coarse reliability ranking of a strategy result.
///
/// Ordered so that `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Derive confidence from strategy kind and sample length alone.
    ///
    /// At equal length a scripted evaluation never grades below a
    /// structured query.
    pub fn grade(kind: StrategyKind, length: usize) -> Self {
        match kind {
            StrategyKind::JsEvaluation => {
                if length > EVAL_HIGH_CONFIDENCE_LEN {
                    Confidence::High
                } else {
                    Confidence::Medium
                }
            }
            StrategyKind::CssSelector => {
                if length > QUERY_MEDIUM_CONFIDENCE_LEN {
                    Confidence::Medium
                } else {
                    Confidence::Low
                }
            }
        }
    }
}

/// One verified extraction approach for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStrategyResult {
    /// Field this strategy extracts.
    pub field: Field,

    /// Strategy kind.
    #[serde(rename = "strategy")]
    pub kind: StrategyKind,

    /// The JavaScript expression or CSS selector that worked.
    pub code: String,

    /// Whether the probe attempt succeeded.
    pub success: bool,

    /// Sample of the extracted text, capped at [`SAMPLE_CAP`] chars.
    pub sample: String,

    /// Full length of the extracted text.
    pub length: usize,

    /// Derived confidence tier.
    pub confidence: Confidence,
}

impl FieldStrategyResult {
    /// Build a successful result from a raw extraction.
    ///
    /// The sample is capped; confidence derives from kind and length.
    pub fn working(field: Field, kind: StrategyKind, code: impl Into<String>, text: &str) -> Self {
        let length = text.len();
        Self {
            field,
            kind,
            code: code.into(),
            success: true,
            sample: text.chars().take(SAMPLE_CAP).collect(),
            length,
            confidence: Confidence::grade(kind, length),
        }
    }
}

/// Sort results by confidence descending, preserving discovery order
/// within a tier.
pub fn rank_by_confidence(results: &mut [FieldStrategyResult]) {
    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_confidence_thresholds() {
        assert_eq!(
            Confidence::grade(StrategyKind::JsEvaluation, 150),
            Confidence::High
        );
        assert_eq!(
            Confidence::grade(StrategyKind::JsEvaluation, 100),
            Confidence::Medium
        );
        assert_eq!(
            Confidence::grade(StrategyKind::JsEvaluation, 12),
            Confidence::Medium
        );
    }

    #[test]
    fn query_confidence_thresholds() {
        assert_eq!(
            Confidence::grade(StrategyKind::CssSelector, 150),
            Confidence::Medium
        );
        assert_eq!(
            Confidence::grade(StrategyKind::CssSelector, 50),
            Confidence::Low
        );
    }

    #[test]
    fn eval_never_below_query_at_equal_length() {
        for length in [11, 51, 101, 500] {
            let eval = Confidence::grade(StrategyKind::JsEvaluation, length);
            let query = Confidence::grade(StrategyKind::CssSelector, length);
            assert!(eval >= query, "length {length}: {eval:?} < {query:?}");
        }
    }

    #[test]
    fn ranking_is_stable_within_tier() {
        let mut results = vec![
            FieldStrategyResult::working(Field::Title, StrategyKind::CssSelector, "h1", &"x".repeat(60)),
            FieldStrategyResult::working(
                Field::Title,
                StrategyKind::JsEvaluation,
                "document.title",
                &"x".repeat(150),
            ),
            FieldStrategyResult::working(Field::Title, StrategyKind::CssSelector, ".title", &"x".repeat(70)),
        ];
        rank_by_confidence(&mut results);

        assert_eq!(results[0].confidence, Confidence::High);
        // Both medium results keep their discovery order.
        assert_eq!(results[1].code, "h1");
        assert_eq!(results[2].code, ".title");
    }

    #[test]
    fn sample_is_capped() {
        let long = "y".repeat(500);
        let result =
            FieldStrategyResult::working(Field::Description, StrategyKind::JsEvaluation, "expr", &long);
        assert_eq!(result.sample.len(), SAMPLE_CAP);
        assert_eq!(result.length, 500);
    }
}
