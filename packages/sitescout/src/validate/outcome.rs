//! Execution outcome classification.
//!
//! The sufficiency heuristic is a coarse, deliberately cheap proxy for
//! structural correctness: a length floor plus a small set of generic
//! descriptive markers. Its exact values are preserved because changing
//! them changes observable validation outcomes.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::traits::RunOutput;

/// Output shorter than this can never be sufficient.
pub const SUFFICIENT_CONTENT_FLOOR: usize = 500;

/// Generic descriptive markers; at least one must appear. The first is
/// matched as-is, the rest against the lowercased output.
pub const DESCRIPTIVE_MARKERS: [&str; 3] = ["About", "responsibilities", "description"];

/// Terminal failure of an artifact execution.
#[derive(Debug, Error)]
pub enum ExecFailure {
    #[error("execution timeout after {secs}s")]
    Timeout { secs: u64 },

    #[error("exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("no output file produced")]
    NoOutput,

    #[error("output too short ({length} chars) or missing key content")]
    Insufficient { length: usize },
}

/// Classification of one artifact execution. Exactly one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Timeout,
    NonZeroExit { code: i32, stderr: String },
    NoOutputProduced,
    InsufficientContent { length: usize },
    Sufficient { length: usize, path: PathBuf },
}

impl Outcome {
    /// Failure description, `None` for [`Outcome::Sufficient`].
    pub fn failure_reason(&self, timeout_secs: u64) -> Option<String> {
        match self {
            Outcome::Timeout => Some(format!("Script execution timeout ({timeout_secs}s)")),
            Outcome::NonZeroExit { code, stderr } => {
                let stderr: String = stderr.chars().take(500).collect();
                Some(format!("Script failed with exit code {code}: {stderr}"))
            }
            Outcome::NoOutputProduced => Some("No output file generated".to_string()),
            Outcome::InsufficientContent { length } => Some(format!(
                "Output too short ({length} chars) or missing key content"
            )),
            Outcome::Sufficient { .. } => None,
        }
    }
}

/// True when output passes the sufficiency heuristic.
pub fn content_is_sufficient(content: &str) -> bool {
    if content.len() <= SUFFICIENT_CONTENT_FLOOR {
        return false;
    }
    let lower = content.to_lowercase();
    content.contains(DESCRIPTIVE_MARKERS[0])
        || lower.contains(DESCRIPTIVE_MARKERS[1])
        || lower.contains(DESCRIPTIVE_MARKERS[2])
}

/// Locate the output file an execution produced for a record.
pub fn find_output_file(output_dir: &Path, record_id: &str) -> Option<PathBuf> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(output_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(record_id))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}

/// Classify one execution into exactly one outcome.
pub fn classify(run: &RunOutput, output_dir: &Path, record_id: &str) -> Outcome {
    if run.timed_out {
        return Outcome::Timeout;
    }
    match run.exit_code {
        Some(0) => {}
        Some(code) => {
            return Outcome::NonZeroExit {
                code,
                stderr: run.stderr.clone(),
            }
        }
        None => {
            return Outcome::NonZeroExit {
                code: -1,
                stderr: run.stderr.clone(),
            }
        }
    }

    let Some(path) = find_output_file(output_dir, record_id) else {
        return Outcome::NoOutputProduced;
    };
    let content = std::fs::read_to_string(&path).unwrap_or_default();

    if content_is_sufficient(&content) {
        Outcome::Sufficient {
            length: content.len(),
            path,
        }
    } else {
        Outcome::InsufficientContent {
            length: content.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_exit() -> RunOutput {
        RunOutput {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn sufficiency_needs_length_and_marker() {
        let long_with_marker = format!("About the role. {}", "x".repeat(600));
        assert!(content_is_sufficient(&long_with_marker));

        let long_without_marker = "x".repeat(600);
        assert!(!content_is_sufficient(&long_without_marker));

        let short_with_marker = "About the role.";
        assert!(!content_is_sufficient(short_with_marker));
    }

    #[test]
    fn markers_beyond_the_first_are_case_insensitive() {
        let content = format!("Key RESPONSIBILITIES include. {}", "x".repeat(600));
        assert!(content_is_sufficient(&content));

        // The first marker is matched exactly.
        let content = format!("all about the team {}", "x".repeat(600));
        // "about" lowercased does not match "About", but "description" or
        // "responsibilities" are absent too.
        assert!(!content_is_sufficient(&content));
    }

    #[test]
    fn timeout_classifies_first() {
        let run = RunOutput {
            timed_out: true,
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(classify(&run, dir.path(), "1"), Outcome::Timeout);
    }

    #[test]
    fn nonzero_exit_classifies_before_output_checks() {
        let run = RunOutput {
            exit_code: Some(2),
            stderr: "boom".into(),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            classify(&run, dir.path(), "1"),
            Outcome::NonZeroExit {
                code: 2,
                stderr: "boom".into()
            }
        );
    }

    #[test]
    fn missing_output_file_is_no_output() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(classify(&clean_exit(), dir.path(), "4300362234"), Outcome::NoOutputProduced);
    }

    #[test]
    fn short_output_is_insufficient() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("linkedin_job_4300362234.txt"), "x".repeat(200)).unwrap();

        assert_eq!(
            classify(&clean_exit(), dir.path(), "4300362234"),
            Outcome::InsufficientContent { length: 200 }
        );
    }

    #[test]
    fn sufficient_output_carries_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("About the role\n{}", "x".repeat(600));
        let file = dir.path().join("linkedin_job_4300362234_title.txt");
        std::fs::write(&file, &content).unwrap();

        match classify(&clean_exit(), dir.path(), "4300362234") {
            Outcome::Sufficient { length, path } => {
                assert_eq!(length, content.len());
                assert_eq!(path, file);
            }
            other => panic!("expected sufficient, got {other:?}"),
        }
    }
}
