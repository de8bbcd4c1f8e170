//! Scriptable mock artifact runner.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, ScoutError};
use crate::traits::{ArtifactRunner, RunOutput};

/// One scripted execution: the output to report and, optionally, a file to
/// write first (simulating the artifact producing scraped output).
#[derive(Debug, Clone)]
pub struct ScriptedRun {
    pub output: RunOutput,
    pub write_file: Option<(PathBuf, String)>,
}

impl ScriptedRun {
    /// A clean zero exit.
    pub fn success() -> Self {
        Self {
            output: RunOutput {
                exit_code: Some(0),
                ..Default::default()
            },
            write_file: None,
        }
    }

    /// A clean exit that also writes an output file.
    pub fn success_with_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            output: RunOutput {
                exit_code: Some(0),
                ..Default::default()
            },
            write_file: Some((path.into(), content.into())),
        }
    }

    /// A non-zero exit with the given stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            output: RunOutput {
                exit_code: Some(exit_code),
                stderr: stderr.into(),
                ..Default::default()
            },
            write_file: None,
        }
    }

    /// A timed-out execution.
    pub fn timeout() -> Self {
        Self {
            output: RunOutput {
                exit_code: None,
                timed_out: true,
                ..Default::default()
            },
            write_file: None,
        }
    }
}

/// Mock runner consuming scripted executions in order.
#[derive(Default)]
pub struct MockRunner {
    runs: Arc<RwLock<VecDeque<ScriptedRun>>>,
    invocations: Arc<RwLock<Vec<(PathBuf, Vec<String>)>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a scripted execution.
    pub fn with_run(self, run: ScriptedRun) -> Self {
        self.runs.write().unwrap().push_back(run);
        self
    }

    /// Number of executions performed.
    pub fn run_count(&self) -> usize {
        self.invocations.read().unwrap().len()
    }

    /// Recorded (artifact path, args) invocations.
    pub fn invocations(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.invocations.read().unwrap().clone()
    }
}

impl Clone for MockRunner {
    fn clone(&self) -> Self {
        Self {
            runs: Arc::clone(&self.runs),
            invocations: Arc::clone(&self.invocations),
        }
    }
}

#[async_trait]
impl ArtifactRunner for MockRunner {
    async fn run(&self, artifact: &Path, args: &[String], _timeout: Duration) -> Result<RunOutput> {
        self.invocations
            .write()
            .unwrap()
            .push((artifact.to_path_buf(), args.to_vec()));

        let scripted = self.runs.write().unwrap().pop_front().ok_or_else(|| {
            ScoutError::Config {
                reason: "mock runner has no queued execution".to_string(),
            }
        })?;

        if let Some((path, content)) = scripted.write_file {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ScoutError::io(parent, e))?;
            }
            std::fs::write(&path, content).map_err(|e| ScoutError::io(&path, e))?;
        }

        Ok(scripted.output)
    }
}
