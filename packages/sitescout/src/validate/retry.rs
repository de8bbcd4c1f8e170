//! Bounded execute-inspect-repair cycle.
//!
//! A state machine over {Running(n), Passed, Failed}: convergent by
//! construction — attempts are bounded, terminal states are deterministic,
//! there is no infinite retry.

use std::time::{Duration, Instant};

use crate::error::{Result, ScoutError};
use crate::generate::{extract_source, persist_artifact};
use crate::prompts::GENERATION_SYSTEM_PROMPT;
use crate::traits::{ArtifactRunner, Oracle};
use crate::types::artifact::Artifact;
use crate::types::config::ScoutConfig;
use crate::types::discovery::DiscoveryRecord;
use crate::validate::outcome::{classify, Outcome};
use crate::validate::repair::build_repair_request;

/// Validation loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// Attempt n is in flight, n ∈ [1, max].
    Running(u32),
    Passed,
    Failed,
}

/// One execution of the artifact inside the loop.
#[derive(Debug, Clone)]
pub struct ValidationAttempt {
    /// 1-based attempt index.
    pub index: u32,

    /// Classified outcome.
    pub outcome: Outcome,

    /// Failure description, `None` when the attempt passed.
    pub reason: Option<String>,

    /// Wall-clock duration of the execution.
    pub duration: Duration,
}

/// Terminal result of the validation loop.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Terminal state: [`ValidationState::Passed`] or [`ValidationState::Failed`].
    pub state: ValidationState,

    /// Every attempt, in order.
    pub attempts: Vec<ValidationAttempt>,

    /// Accumulated failure reasons.
    pub reasons: Vec<String>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.state == ValidationState::Passed
    }

    /// Convert a failed report into the typed run-level error.
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(ScoutError::Validation {
                attempts: self.attempts.len() as u32,
                reasons: self.reasons,
            })
        }
    }
}

/// Validate an artifact against the record's real document URL, repairing
/// through the oracle on failure.
///
/// Repair requests carry the current source, the specific failure signal
/// and the original verified strategy bundle — never the narrative. Every
/// repair overwrites the artifact on disk; partial artifacts are retained
/// even when the loop fails.
pub async fn validate_artifact(
    oracle: &dyn Oracle,
    runner: &dyn ArtifactRunner,
    artifact: &mut Artifact,
    record: &DiscoveryRecord,
    config: &ScoutConfig,
) -> Result<ValidationReport> {
    let max_attempts = config.max_validation_attempts.max(1);
    let timeout = Duration::from_secs(config.execution_timeout_secs);
    let test_url = record.canonical_url.clone();

    let mut state = ValidationState::Running(1);
    let mut attempts = Vec::new();
    let mut reasons = Vec::new();

    while let ValidationState::Running(n) = state {
        tracing::info!(attempt = n, max = max_attempts, "validation attempt");

        let started = Instant::now();
        let run = runner
            .run(&artifact.path, &[test_url.clone()], timeout)
            .await?;
        let outcome = classify(&run, &config.output_dir, &record.record_id);
        let reason = outcome.failure_reason(config.execution_timeout_secs);
        attempts.push(ValidationAttempt {
            index: n,
            outcome: outcome.clone(),
            reason: reason.clone(),
            duration: started.elapsed(),
        });

        match reason {
            None => {
                if let Outcome::Sufficient { length, .. } = outcome {
                    tracing::info!(length, "validation passed");
                }
                state = ValidationState::Passed;
            }
            Some(reason) => {
                tracing::warn!(attempt = n, %reason, "validation attempt failed");
                reasons.push(reason.clone());

                if n < max_attempts {
                    let request = build_repair_request(&artifact.source, &reason, record);
                    let response = oracle.complete(GENERATION_SYSTEM_PROMPT, &request).await?;
                    artifact.source = extract_source(&response);
                    persist_artifact(artifact)?;
                    tracing::info!("applied repair, retrying");
                    state = ValidationState::Running(n + 1);
                } else {
                    state = ValidationState::Failed;
                }
            }
        }
    }

    Ok(ValidationReport {
        state,
        attempts,
        reasons,
    })
}
