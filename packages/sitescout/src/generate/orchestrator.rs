//! Code generation orchestrator: turns a discovery record into a
//! persisted, contract-checked artifact.

use std::path::Path;

use crate::error::{Result, ScoutError};
use crate::generate::contract::{check_contract, extract_source, ContractReport};
use crate::generate::request::build_generation_request;
use crate::prompts::GENERATION_SYSTEM_PROMPT;
use crate::sites::SiteRegistry;
use crate::traits::Oracle;
use crate::types::artifact::Artifact;
use crate::types::config::ScoutConfig;
use crate::types::discovery::DiscoveryRecord;

/// Generate the reusable extraction program for a record's family.
///
/// The record's site id must match the profile classifying its URL. The
/// artifact is persisted site-scoped, overwriting any prior version, and
/// retained on disk even when later validation fails.
pub async fn generate(
    registry: &SiteRegistry,
    oracle: &dyn Oracle,
    record: &DiscoveryRecord,
    config: &ScoutConfig,
) -> Result<(Artifact, ContractReport)> {
    let classified = registry
        .classify(&record.url)
        .ok_or_else(|| ScoutError::Classification {
            url: record.url.clone(),
        })?;
    if classified.id != record.site {
        return Err(ScoutError::SiteMismatch {
            claimed: record.site.to_string(),
            classified: classified.id.to_string(),
        });
    }
    let profile = classified;

    if record.low_quality {
        tracing::warn!("generating from a low-quality record; strategies are unverified defaults");
    }

    let request = build_generation_request(record, profile);
    tracing::info!(site = %record.site, "requesting artifact generation");
    let response = oracle.complete(GENERATION_SYSTEM_PROMPT, &request).await?;

    let source = extract_source(&response);
    let report = check_contract(&source, record.site, &record.record_id)?;
    for warning in &report.warnings {
        tracing::warn!(%warning, "contract warning");
    }

    let path = config.scripts_dir.join(Artifact::file_name(record.site));
    let mut artifact = Artifact {
        site: record.site,
        source,
        path,
        executable: false,
    };
    persist_artifact(&mut artifact)?;

    tracing::info!(path = %artifact.path.display(), "artifact persisted");
    Ok((artifact, report))
}

/// Write the artifact to its site-scoped path, with a shebang and the
/// executable bit. Also used by the validation loop when applying repairs.
pub fn persist_artifact(artifact: &mut Artifact) -> Result<()> {
    if let Some(parent) = artifact.path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScoutError::io(parent, e))?;
    }

    let body = if artifact.source.starts_with("#!") {
        artifact.source.clone()
    } else {
        format!("#!/usr/bin/env python3\n{}", artifact.source)
    };
    std::fs::write(&artifact.path, body).map_err(|e| ScoutError::io(&artifact.path, e))?;

    artifact.executable = set_executable(&artifact.path);
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).is_ok()
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::SiteId;
    use crate::testing::MockOracle;
    use crate::types::discovery::{InteractionStrategy, WaitHints, RECORD_SCHEMA_VERSION};
    use crate::types::strategy::{Field, FieldStrategyResult, StrategyKind};
    use chrono::Utc;
    use indexmap::IndexMap;

    fn record(site: SiteId, url: &str) -> DiscoveryRecord {
        let mut strategies = IndexMap::new();
        strategies.insert(
            Field::Title,
            vec![FieldStrategyResult::working(
                Field::Title,
                StrategyKind::JsEvaluation,
                "document.querySelector('h1')?.textContent?.trim()",
                &"Engineering Manager, API Product and Platforms".repeat(3),
            )],
        );

        DiscoveryRecord {
            record_id: "4300362234".into(),
            url: url.into(),
            canonical_url: url.into(),
            site,
            strategies,
            interaction: InteractionStrategy::not_needed(800),
            html_fragments: IndexMap::new(),
            observations: vec![],
            edge_cases: vec![],
            wait_hints: WaitHints::default(),
            low_quality: false,
            timestamp: Utc::now(),
            schema_version: RECORD_SCHEMA_VERSION.into(),
        }
    }

    fn scraper_response() -> String {
        "```python\nimport re\n\ndef sanitize_filename(text):\n    return text[:100]\n\ndef extract_job_id(url):\n    m = re.search(r'/jobs/view/(\\d+)', url)\n    return m.group(1) if m else None\n\ndef scrape_linkedin_job(page, url):\n    return page.evaluate('() => document.title')\n\ndef format_job_description(data):\n    return str(data)\n\ndef main():\n    pass\n```"
            .to_string()
    }

    #[tokio::test]
    async fn generates_and_persists_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let oracle = MockOracle::new().with_response(scraper_response());
        let record = record(SiteId::LinkedIn, "https://www.linkedin.com/jobs/view/4300362234");

        let (artifact, report) = generate(&SiteRegistry::with_defaults(), &oracle, &record, &config)
            .await
            .unwrap();

        assert_eq!(artifact.site, SiteId::LinkedIn);
        assert!(artifact.path.ends_with("linkedin_scraper.py"));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        let written = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(written.starts_with("#!/usr/bin/env python3\n"));
        assert!(written.contains("scrape_linkedin_job"));
    }

    #[tokio::test]
    async fn site_mismatch_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let oracle = MockOracle::new().with_response(scraper_response());
        // Record claims Indeed but the url classifies as LinkedIn.
        let record = record(SiteId::Indeed, "https://www.linkedin.com/jobs/view/4300362234");

        let err = generate(&SiteRegistry::with_defaults(), &oracle, &record, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::SiteMismatch { .. }));
        // The oracle was never consulted.
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn contract_violation_aborts_generation() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let oracle = MockOracle::new().with_response("```python\ndef main():\n    pass\n```");
        let record = record(SiteId::LinkedIn, "https://www.linkedin.com/jobs/view/4300362234");

        let err = generate(&SiteRegistry::with_defaults(), &oracle, &record, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::ContractViolation { .. }));
    }

    #[tokio::test]
    async fn regeneration_overwrites_the_prior_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScoutConfig::default().rooted_at(dir.path());
        let record = record(SiteId::LinkedIn, "https://www.linkedin.com/jobs/view/4300362234");

        let first = MockOracle::new().with_response(scraper_response());
        let (old, _) = generate(&SiteRegistry::with_defaults(), &first, &record, &config)
            .await
            .unwrap();

        let second = MockOracle::new()
            .with_response(scraper_response().replace("document.title", "document.URL"));
        let (new, _) = generate(&SiteRegistry::with_defaults(), &second, &record, &config)
            .await
            .unwrap();

        assert_eq!(old.path, new.path);
        let written = std::fs::read_to_string(&new.path).unwrap();
        assert!(written.contains("document.URL"));
    }
}
