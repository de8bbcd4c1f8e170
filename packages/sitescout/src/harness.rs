//! Multi-document test harness.
//!
//! Runs the final artifact over a held-out document set and computes an
//! aggregate success rate. Observational only: one document's failure never
//! aborts the batch, and a below-target rate is a warning, not a gate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use crate::error::{Result, ScoutError};
use crate::sites::{SiteId, SiteProfile};
use crate::traits::ArtifactRunner;
use crate::types::artifact::Artifact;
use crate::types::config::ScoutConfig;
use crate::types::report::{SuccessRateReport, TestResult};
use crate::validate::{find_output_file, SUFFICIENT_CONTENT_FLOOR};

/// Built-in held-out documents per family, used when the caller provides
/// none.
pub fn default_test_urls(site: SiteId) -> &'static [&'static str] {
    match site {
        SiteId::LinkedIn => &["https://www.linkedin.com/jobs/view/4305267405"],
        SiteId::Indeed => &["https://www.indeed.com/viewjob?jk=ee188e8f304a1b67&from=shareddesktop_copy"],
        SiteId::Glassdoor => &[],
    }
}

/// Run the artifact over every URL, sequentially, and aggregate.
///
/// Results are appended in input order. The aggregate is 0.0 for an empty
/// batch. Success here applies the length floor only; the stricter marker
/// heuristic belongs to single-artifact validation.
pub async fn run_batch(
    runner: &dyn ArtifactRunner,
    artifact: &Artifact,
    profile: &SiteProfile,
    urls: &[String],
    config: &ScoutConfig,
) -> Result<SuccessRateReport> {
    let timeout = Duration::from_secs(config.execution_timeout_secs);
    let mut results = Vec::with_capacity(urls.len());

    for (i, url) in urls.iter().enumerate() {
        tracing::info!(test = i + 1, total = urls.len(), %url, "batch test");
        let result = run_one(runner, artifact, profile, url, timeout, config).await;
        if let Some(error) = &result.error {
            tracing::warn!(%url, %error, "batch test failed");
        } else {
            tracing::info!(%url, length = result.output_length, "batch test passed");
        }
        results.push(result);
    }

    let passed = results.iter().filter(|r| r.success).count();
    let success_rate = SuccessRateReport::percentage(passed, results.len());
    tracing::info!(
        success_rate,
        passed,
        total = results.len(),
        "batch complete"
    );
    if !results.is_empty() && success_rate < config.target_success_rate {
        tracing::warn!(
            success_rate,
            target = config.target_success_rate,
            "success rate below target"
        );
    }

    Ok(SuccessRateReport {
        site: artifact.site,
        artifact_path: artifact.path.clone(),
        timestamp: Utc::now(),
        success_rate,
        results,
    })
}

/// Execute and classify one document. Failures are absorbed into the
/// result, never propagated.
async fn run_one(
    runner: &dyn ArtifactRunner,
    artifact: &Artifact,
    profile: &SiteProfile,
    url: &str,
    timeout: Duration,
    config: &ScoutConfig,
) -> TestResult {
    let record_id = profile.extract_record_id(url);
    let mut result = TestResult {
        url: url.to_string(),
        record_id: record_id.clone(),
        success: false,
        output_path: None,
        output_length: 0,
        error: None,
    };

    let Some(record_id) = record_id else {
        result.error = Some("Could not extract record id from url".to_string());
        return result;
    };

    let run = match runner
        .run(&artifact.path, &[url.to_string()], timeout)
        .await
    {
        Ok(run) => run,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };

    if run.timed_out {
        result.error = Some(format!("Timeout ({}s)", config.execution_timeout_secs));
        return result;
    }
    if !run.succeeded() {
        let stderr: String = run.stderr.chars().take(200).collect();
        result.error = Some(format!(
            "Exit code {}: {stderr}",
            run.exit_code.unwrap_or(-1)
        ));
        return result;
    }

    let Some(path) = find_output_file(&config.output_dir, &record_id) else {
        result.error = Some("No output file generated".to_string());
        return result;
    };
    let content = std::fs::read_to_string(&path).unwrap_or_default();

    result.output_path = Some(path);
    result.output_length = content.len();
    if content.len() > SUFFICIENT_CONTENT_FLOOR {
        result.success = true;
    } else {
        result.error = Some(format!("Output too short ({} chars)", content.len()));
    }
    result
}

/// Render the report as plain text.
pub fn render_report(report: &SuccessRateReport) -> String {
    let mut lines = vec![
        format!(
            "Multi-Document Test Report: {} Scraper",
            report.site.as_str().to_uppercase()
        ),
        "=".repeat(60),
        format!("Script: {}", report.artifact_path.display()),
        format!("Test Date: {}", report.timestamp.format("%Y-%m-%d %H:%M:%S")),
        format!(
            "Success Rate: {:.1}% ({}/{})",
            report.success_rate,
            report.passed(),
            report.results.len()
        ),
        String::new(),
        "Detailed Results:".to_string(),
        "-".repeat(60),
    ];

    for (i, result) in report.results.iter().enumerate() {
        let status = if result.success { "PASS" } else { "FAIL" };
        lines.push(String::new());
        lines.push(format!("Test {}: {status}", i + 1));
        lines.push(format!("  URL: {}", result.url));
        lines.push(format!(
            "  Record ID: {}",
            result.record_id.as_deref().unwrap_or("unknown")
        ));
        if result.success {
            if let Some(path) = &result.output_path {
                lines.push(format!("  Output: {}", path.display()));
            }
            lines.push(format!("  Output Length: {} chars", result.output_length));
        } else {
            lines.push(format!(
                "  Error: {}",
                result.error.as_deref().unwrap_or("unknown")
            ));
        }
    }

    lines.push(String::new());
    lines.push("=".repeat(60));
    lines.join("\n")
}

/// Persist the rendered report, returning its path.
pub fn save_report(dir: &Path, report: &SuccessRateReport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ScoutError::io(dir, e))?;

    let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%S");
    let path = dir.join(format!("{}_scraper_test_{timestamp}.txt", report.site));
    std::fs::write(&path, render_report(report)).map_err(|e| ScoutError::io(&path, e))?;

    tracing::info!(path = %path.display(), "test report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::SiteRegistry;
    use crate::testing::{MockRunner, ScriptedRun};

    fn artifact(dir: &Path) -> Artifact {
        Artifact {
            site: SiteId::LinkedIn,
            source: String::new(),
            path: dir.join("linkedin_scraper.py"),
            executable: true,
        }
    }

    fn long_output() -> String {
        "x".repeat(600)
    }

    #[tokio::test]
    async fn empty_batch_reports_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let registry = SiteRegistry::with_defaults();

        let report = run_batch(
            &MockRunner::new(),
            &artifact(dir.path()),
            registry.get(SiteId::LinkedIn),
            &[],
            &config,
        )
        .await
        .unwrap();

        assert_eq!(report.success_rate, 0.0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn three_of_four_is_seventy_five_percent() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let registry = SiteRegistry::with_defaults();

        let urls: Vec<String> = (1..=4)
            .map(|i| format!("https://www.linkedin.com/jobs/view/100{i}"))
            .collect();
        let runner = MockRunner::new()
            .with_run(ScriptedRun::success_with_file(
                config.output_dir.join("linkedin_job_1001.txt"),
                long_output(),
            ))
            .with_run(ScriptedRun::success_with_file(
                config.output_dir.join("linkedin_job_1002.txt"),
                long_output(),
            ))
            .with_run(ScriptedRun::failure(1, "Traceback"))
            .with_run(ScriptedRun::success_with_file(
                config.output_dir.join("linkedin_job_1004.txt"),
                long_output(),
            ));

        let report = run_batch(
            &runner,
            &artifact(dir.path()),
            registry.get(SiteId::LinkedIn),
            &urls,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(report.success_rate, 75.0);
        assert_eq!(report.results.len(), 4);
        // Input order is preserved; the third document carries the error.
        assert_eq!(report.results[2].url, urls[2]);
        assert!(report.results[2].error.as_deref().unwrap().starts_with("Exit code 1"));
    }

    #[tokio::test]
    async fn one_failure_never_aborts_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let registry = SiteRegistry::with_defaults();

        let urls = vec![
            "https://www.linkedin.com/jobs/view/2001".to_string(),
            "https://www.linkedin.com/jobs/view/2002".to_string(),
        ];
        let runner = MockRunner::new()
            .with_run(ScriptedRun::timeout())
            .with_run(ScriptedRun::success_with_file(
                config.output_dir.join("linkedin_job_2002.txt"),
                long_output(),
            ));

        let report = run_batch(
            &runner,
            &artifact(dir.path()),
            registry.get(SiteId::LinkedIn),
            &urls,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].error.as_deref(), Some("Timeout (90s)"));
        assert!(report.results[1].success);
        assert_eq!(report.success_rate, 50.0);
    }

    #[tokio::test]
    async fn short_output_fails_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let registry = SiteRegistry::with_defaults();

        let urls = vec!["https://www.linkedin.com/jobs/view/3001".to_string()];
        let runner = MockRunner::new().with_run(ScriptedRun::success_with_file(
            config.output_dir.join("linkedin_job_3001.txt"),
            "x".repeat(100),
        ));

        let report = run_batch(
            &runner,
            &artifact(dir.path()),
            registry.get(SiteId::LinkedIn),
            &urls,
            &config,
        )
        .await
        .unwrap();

        assert!(!report.results[0].success);
        assert_eq!(
            report.results[0].error.as_deref(),
            Some("Output too short (100 chars)")
        );
    }

    #[tokio::test]
    async fn report_renders_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let registry = SiteRegistry::with_defaults();

        let urls = vec!["https://www.linkedin.com/jobs/view/4001".to_string()];
        let runner = MockRunner::new().with_run(ScriptedRun::success_with_file(
            config.output_dir.join("linkedin_job_4001.txt"),
            long_output(),
        ));

        let report = run_batch(
            &runner,
            &artifact(dir.path()),
            registry.get(SiteId::LinkedIn),
            &urls,
            &config,
        )
        .await
        .unwrap();

        let text = render_report(&report);
        assert!(text.contains("Multi-Document Test Report: LINKEDIN Scraper"));
        assert!(text.contains("Success Rate: 100.0% (1/1)"));
        assert!(text.contains("Test 1: PASS"));
        assert!(text.contains("4001"));

        let path = save_report(&config.reports_dir, &report).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("Test 1: PASS"));
    }
}
