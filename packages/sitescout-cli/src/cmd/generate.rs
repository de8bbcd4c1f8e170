//! `sitescout generate` - create, validate and optionally batch-test a
//! scraper from a discovery record.

use std::path::Path;

use anyhow::{Context, Result};

use sitescout::oracles::RigOracle;
use sitescout::{
    default_test_urls, generate, load_record, run_batch, save_report, validate_artifact,
    ProcessRunner, ScoutConfig, SiteRegistry,
};

pub async fn run(record_path: &Path, multi_test: bool) -> Result<()> {
    let config = ScoutConfig::from_env().context("loading configuration")?;
    let registry = SiteRegistry::with_defaults();

    let record = load_record(record_path)
        .with_context(|| format!("loading discovery record {}", record_path.display()))?;
    let oracle = RigOracle::from_env(&config).context("initializing oracle")?;

    let (mut artifact, contract) = generate(&registry, &oracle, &record, &config).await?;
    println!("Reusable {} scraper generated", record.site);
    println!("  Location: {}", artifact.path.display());
    for warning in &contract.warnings {
        println!("  Warning: {warning}");
    }

    let runner = ProcessRunner::new();
    let validation = validate_artifact(&oracle, &runner, &mut artifact, &record, &config).await?;
    if validation.passed() {
        println!("Validation passed: script is production-ready");
        println!("  Usage: {} <job_url>", artifact.path.display());
    } else {
        // The artifact stays on disk for post-mortem inspection.
        println!("Validation failed; partial artifact retained at {}", artifact.path.display());
    }
    let _ = validation.into_result()?;

    if multi_test {
        let profile = registry.get(record.site);
        let urls: Vec<String> = default_test_urls(record.site)
            .iter()
            .map(|s| s.to_string())
            .collect();

        if urls.is_empty() {
            println!("No held-out test documents for {}", record.site);
        } else {
            let report = run_batch(&runner, &artifact, profile, &urls, &config).await?;
            let report_path = save_report(&config.reports_dir, &report)?;

            println!("Multi-document testing complete");
            println!("  Success rate: {:.1}%", report.success_rate);
            println!("  Report: {}", report_path.display());
            if report.success_rate < config.target_success_rate {
                println!(
                    "  Warning: success rate below {:.0}% target",
                    config.target_success_rate
                );
            }
        }
    }

    Ok(())
}
