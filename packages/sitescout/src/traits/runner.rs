//! Process-execution capability for generated artifacts.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Captured output of one artifact execution.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Process exit code; `None` when the process was killed.
    pub exit_code: Option<i32>,

    /// Captured stdout, capped.
    pub stdout: String,

    /// Captured stderr, capped.
    pub stderr: String,

    /// True when the wall-clock timeout expired and the process was killed.
    pub timed_out: bool,

    /// Wall-clock duration of the execution.
    pub duration: Duration,
}

impl RunOutput {
    /// True for a clean zero exit.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs a generated artifact in an isolated external process.
///
/// Each attempt gets a fresh process; no mutable state is shared across
/// attempts. A timeout is reported in [`RunOutput::timed_out`], not as an
/// error — the caller classifies it.
#[async_trait]
pub trait ArtifactRunner: Send + Sync {
    /// Execute the artifact with the given arguments under a hard timeout.
    async fn run(&self, artifact: &Path, args: &[String], timeout: Duration) -> Result<RunOutput>;
}
