//! Batch test results and the aggregate success-rate report.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sites::SiteId;

/// Outcome of running the artifact against one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Document URL.
    pub url: String,

    /// Record id extracted from the URL, when resolvable.
    pub record_id: Option<String>,

    /// Whether the run produced sufficient output.
    pub success: bool,

    /// Output file the artifact wrote, when one was found.
    pub output_path: Option<PathBuf>,

    /// Length of the produced output.
    pub output_length: usize,

    /// Failure description for unsuccessful runs.
    pub error: Option<String>,
}

/// Aggregate report over a held-out document set.
///
/// Observational: a rate below the configured target is a warning, never a
/// gate. Results are kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateReport {
    /// Family the batch ran against.
    pub site: SiteId,

    /// Artifact that was tested.
    pub artifact_path: PathBuf,

    /// When the batch ran.
    pub timestamp: DateTime<Utc>,

    /// passed / total × 100; 0.0 for an empty batch.
    pub success_rate: f64,

    /// Per-document results, in input order.
    pub results: Vec<TestResult>,
}

impl SuccessRateReport {
    /// Compute the aggregate percentage. Defined as 0.0 for an empty batch.
    pub fn percentage(passed: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (passed as f64 / total as f64) * 100.0
        }
    }

    /// Number of passing results.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }
}
