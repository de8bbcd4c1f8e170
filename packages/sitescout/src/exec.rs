//! Subprocess execution of generated artifacts.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::{Result, ScoutError};
use crate::traits::{ArtifactRunner, RunOutput};

/// Captured stdout/stderr are capped at this many bytes per stream.
pub const MAX_CAPTURED_OUTPUT: usize = 10 * 1024;

/// Runs artifacts through an interpreter in an isolated subprocess.
///
/// Each execution gets a fresh process under a hard wall-clock timeout; an
/// expired process is killed and reported as timed out, never as an error.
pub struct ProcessRunner {
    interpreter: String,
}

impl ProcessRunner {
    /// Create a runner using the default `python3` interpreter.
    pub fn new() -> Self {
        Self {
            interpreter: "python3".to_string(),
        }
    }

    /// Use a specific interpreter binary.
    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactRunner for ProcessRunner {
    async fn run(&self, artifact: &Path, args: &[String], timeout: Duration) -> Result<RunOutput> {
        let started = Instant::now();

        let child = tokio::process::Command::new(&self.interpreter)
            .arg(artifact)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScoutError::io(artifact, e))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(RunOutput {
                exit_code: output.status.code(),
                stdout: cap_output(&output.stdout),
                stderr: cap_output(&output.stderr),
                timed_out: false,
                duration: started.elapsed(),
            }),
            Ok(Err(e)) => Err(ScoutError::io(artifact, e)),
            Err(_) => {
                // The dropped future kills the child via kill_on_drop.
                tracing::warn!(
                    artifact = %artifact.display(),
                    timeout_secs = timeout.as_secs(),
                    "execution timed out, killing process"
                );
                Ok(RunOutput {
                    exit_code: None,
                    stdout: String::new(),
                    stderr: String::new(),
                    timed_out: true,
                    duration: started.elapsed(),
                })
            }
        }
    }
}

fn cap_output(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.len() > MAX_CAPTURED_OUTPUT {
        let capped: String = text.chars().take(MAX_CAPTURED_OUTPUT).collect();
        format!("{capped}\n... (output truncated)")
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_output_is_untouched() {
        assert_eq!(cap_output(b"hello"), "hello");
    }

    #[test]
    fn oversized_output_is_truncated_with_marker() {
        let big = vec![b'a'; MAX_CAPTURED_OUTPUT * 2];
        let capped = cap_output(&big);
        assert!(capped.ends_with("... (output truncated)"));
        assert!(capped.len() < big.len());
    }

    #[tokio::test]
    async fn missing_interpreter_is_an_io_error() {
        let runner = ProcessRunner::with_interpreter("definitely-not-a-real-binary");
        let result = runner
            .run(Path::new("script.py"), &[], Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(ScoutError::Io { .. })));
    }
}
