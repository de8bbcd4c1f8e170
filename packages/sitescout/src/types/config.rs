//! Runtime configuration for the sitescout pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Configuration for discovery, generation and validation runs.
///
/// Thresholds that define observable behavior (confidence cut-offs, the
/// sufficiency floor, marker set) are named constants next to their
/// consumers; this struct carries the runtime knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Oracle model identifier.
    pub model_name: String,

    /// Maximum tokens per oracle completion.
    pub max_tokens: u64,

    /// Navigation timeout in milliseconds. Default: 60000.
    pub navigation_timeout_ms: u64,

    /// Settle wait after navigation, for dynamic content. Default: 3000.
    pub settle_wait_ms: u64,

    /// Per-selector timeout while probing fallback locators. Default: 3000.
    pub locator_probe_timeout_ms: u64,

    /// Per-trigger timeout while probing expansion affordances. Default: 2000.
    pub trigger_probe_timeout_ms: u64,

    /// Settle wait after clicking an expansion trigger. Default: 1500.
    pub expansion_settle_ms: u64,

    /// Wall-clock timeout for one artifact execution, in seconds. Default: 90.
    pub execution_timeout_secs: u64,

    /// Maximum validation attempts before the loop fails. Default: 3.
    pub max_validation_attempts: u32,

    /// Directory for persisted discovery records.
    pub records_dir: PathBuf,

    /// Directory for generated artifacts.
    pub scripts_dir: PathBuf,

    /// Directory the artifacts write scraped output into.
    pub output_dir: PathBuf,

    /// Directory for multi-document test reports.
    pub reports_dir: PathBuf,

    /// Batch success rate below this percentage logs a warning. Default: 85.0.
    pub target_success_rate: f64,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            model_name: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 8192,
            navigation_timeout_ms: 60_000,
            settle_wait_ms: 3_000,
            locator_probe_timeout_ms: 3_000,
            trigger_probe_timeout_ms: 2_000,
            expansion_settle_ms: 1_500,
            execution_timeout_secs: 90,
            max_validation_attempts: 3,
            records_dir: PathBuf::from("discovery_records"),
            scripts_dir: PathBuf::from("generated_scripts"),
            output_dir: PathBuf::from("job_descriptions"),
            reports_dir: PathBuf::from("test_reports"),
            target_success_rate: 85.0,
        }
    }
}

impl ScoutConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from environment variables.
    ///
    /// Recognized: `MODEL_NAME`, `MAX_TOKENS`. Unset variables keep their
    /// defaults; a malformed `MAX_TOKENS` is a config error rather than a
    /// silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(model) = std::env::var("MODEL_NAME") {
            config.model_name = model;
        }
        if let Ok(raw) = std::env::var("MAX_TOKENS") {
            config.max_tokens = raw.parse().map_err(|_| ScoutError::Config {
                reason: format!("MAX_TOKENS is not a number: {raw}"),
            })?;
        }

        Ok(config)
    }

    /// Set the oracle model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Set the validation attempt cap.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_validation_attempts = max;
        self
    }

    /// Set the artifact execution timeout.
    pub fn with_execution_timeout(mut self, secs: u64) -> Self {
        self.execution_timeout_secs = secs;
        self
    }

    /// Root all output directories under the given base path.
    pub fn rooted_at(mut self, base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        self.records_dir = base.join("discovery_records");
        self.scripts_dir = base.join("generated_scripts");
        self.output_dir = base.join("job_descriptions");
        self.reports_dir = base.join("test_reports");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ScoutConfig::default();
        assert_eq!(config.navigation_timeout_ms, 60_000);
        assert_eq!(config.settle_wait_ms, 3_000);
        assert_eq!(config.expansion_settle_ms, 1_500);
        assert_eq!(config.execution_timeout_secs, 90);
        assert_eq!(config.max_validation_attempts, 3);
        assert_eq!(config.target_success_rate, 85.0);
    }

    #[test]
    fn rooted_at_moves_every_directory() {
        let config = ScoutConfig::default().rooted_at("/tmp/scout");
        assert_eq!(config.records_dir, PathBuf::from("/tmp/scout/discovery_records"));
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/scout/test_reports"));
    }
}
