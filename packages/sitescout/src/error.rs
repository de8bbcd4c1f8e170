//! Typed errors for the sitescout pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Probe-local failures use
//! [`DocumentError`] and are always absorbed by the probers; run-level
//! failures propagate as [`ScoutError`] with cause chains.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ExecFailure;

/// Run-level errors that abort a discovery, generation or validation run.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// URL does not match any registered site profile
    #[error("unsupported site: {url}")]
    Classification { url: String },

    /// Site matched but no record identifier could be extracted
    #[error("could not extract record id from {site} url: {url}")]
    UnresolvableIdentifier { site: String, url: String },

    /// Page could not be acquired
    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: DocumentError,
    },

    /// Oracle call failed or returned nothing usable
    #[error("oracle error: {0}")]
    Oracle(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Record's site id does not match the profile classifying its URL
    #[error("record claims site {claimed} but url classifies as {classified}")]
    SiteMismatch { claimed: String, classified: String },

    /// Generated source violates a hard contract clause
    #[error("generation contract violation: {reason}")]
    ContractViolation { reason: String },

    /// Validation loop exhausted its attempts
    #[error("validation failed after {attempts} attempts: {}", reasons.join("; "))]
    Validation {
        attempts: u32,
        reasons: Vec<String>,
    },

    /// Artifact execution failed outside the validation loop
    #[error("execution failed: {0}")]
    Execution(#[from] ExecFailure),

    /// Discovery record or artifact file operation failed
    #[error("io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (missing env var, bad value)
    #[error("config error: {reason}")]
    Config { reason: String },
}

/// Errors from a single document operation.
///
/// These are local to one probe attempt: the probers discard them and move
/// on to the next strategy. Only navigation failures are promoted to
/// [`ScoutError::Navigation`] by the discovery orchestrator.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Navigation did not reach a ready state
    #[error("navigation failed: {url}")]
    Navigation { url: String },

    /// Script evaluation failed in the document context
    #[error("evaluation failed: {reason}")]
    Eval { reason: String },

    /// Selector did not resolve within its timeout
    #[error("element not found: {selector}")]
    NotFound { selector: String },

    /// Operation exceeded its timeout
    #[error("document operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// Transport-level failure talking to the rendering service
    #[error("browser transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ScoutError {
    /// Convenience constructor for io errors with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for document operations.
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
