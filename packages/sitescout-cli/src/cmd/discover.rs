//! `sitescout discover` - probe a job page and persist a discovery record.

use anyhow::{anyhow, Context, Result};

use sitescout::browsers::RemoteDocument;
use sitescout::oracles::RigOracle;
use sitescout::{discover, save_record, ScoutConfig, SiteId, SiteRegistry};

pub async fn run(url: &str, site: Option<&str>) -> Result<()> {
    let config = ScoutConfig::from_env().context("loading configuration")?;
    let registry = SiteRegistry::with_defaults();

    let site_hint: Option<SiteId> = site
        .map(|s| s.parse().map_err(|e: String| anyhow!(e)))
        .transpose()?;

    let oracle = RigOracle::from_env(&config).context("initializing oracle")?;
    let document = RemoteDocument::from_env()
        .await
        .context("connecting to browser service")?;

    let record = discover(&registry, &document, &oracle, url, site_hint, &config).await?;
    let path = save_record(&config.records_dir, &record)?;

    let profile = registry.get(record.site);
    println!("Discovery complete");
    println!("  Site: {}", profile.display_name);
    println!("  Record ID: {}", record.record_id);
    if record.low_quality {
        println!("  Quality: LOW (no field has a working strategy)");
    }
    println!("  Record saved: {}", path.display());
    println!();
    println!("Next step:");
    println!("  sitescout generate {}", path.display());

    Ok(())
}
