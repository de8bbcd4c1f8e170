//! Discovery orchestrator: drives navigation, runs both probers and
//! assembles a discovery record.

use std::time::Duration;

use chrono::Utc;
use indexmap::IndexMap;

use crate::discovery::annotate::{build_annotation_prompt, parse_annotation, Annotation};
use crate::error::{Result, ScoutError};
use crate::probe;
use crate::prompts::ANNOTATION_SYSTEM_PROMPT;
use crate::sites::{SiteId, SiteRegistry};
use crate::traits::{Document, Oracle};
use crate::types::config::ScoutConfig;
use crate::types::discovery::{DiscoveryRecord, RECORD_SCHEMA_VERSION};
use crate::types::strategy::Field;

/// Selector used to detect a dismissable modal dialog.
const MODAL_SELECTOR: &str = "button:has-text('Dismiss')";

/// Run discovery against one document.
///
/// Classifies the URL (or validates the hint), requires a resolvable record
/// id, acquires the live document, probes every tracked field and the
/// expansion affordance, then layers the oracle narrative on top of the
/// verified evidence. A page with no working strategy for any field still
/// produces a record, flagged low-quality.
pub async fn discover(
    registry: &SiteRegistry,
    document: &dyn Document,
    oracle: &dyn Oracle,
    url: &str,
    site_hint: Option<SiteId>,
    config: &ScoutConfig,
) -> Result<DiscoveryRecord> {
    let profile = match site_hint {
        Some(id) => {
            let profile = registry.get(id);
            if !profile.matches(url) {
                return Err(ScoutError::Classification {
                    url: url.to_string(),
                });
            }
            profile
        }
        None => registry
            .classify(url)
            .ok_or_else(|| ScoutError::Classification {
                url: url.to_string(),
            })?,
    };

    let record_id =
        profile
            .extract_record_id(url)
            .ok_or_else(|| ScoutError::UnresolvableIdentifier {
                site: profile.id.to_string(),
                url: url.to_string(),
            })?;
    let canonical_url = profile.canonical_url(&record_id);

    tracing::info!(site = %profile.id, record_id = %record_id, "starting discovery");

    document
        .navigate(&canonical_url, Duration::from_millis(config.navigation_timeout_ms))
        .await
        .map_err(|source| ScoutError::Navigation {
            url: canonical_url.clone(),
            source,
        })?;
    tokio::time::sleep(Duration::from_millis(config.settle_wait_ms)).await;

    if let Ok(title) = document.title().await {
        tracing::info!(title = %title, "page loaded");
    }
    if let Ok(content) = document.content().await {
        tracing::debug!(content_length = content.len(), "document content captured");
    }
    let modal_present = document
        .locate_and_wait(MODAL_SELECTOR, Duration::from_millis(config.trigger_probe_timeout_ms))
        .await
        .is_ok();

    // Probing is strictly ordered: no two probes race the same document.
    let mut strategies = IndexMap::new();
    for field in Field::ALL {
        let results = probe::probe_field(document, field, config).await;
        if let Some(best) = results.first() {
            tracing::info!(
                field = %field,
                strategy = ?best.kind,
                confidence = ?best.confidence,
                "found working strategy"
            );
        } else {
            tracing::warn!(field = %field, "no working strategy");
        }
        strategies.insert(field, results);
    }

    let interaction = probe::probe_expansion(document, config).await;
    if interaction.needed {
        tracing::info!(impact = ?interaction.impact, "expansion required");
    }

    let verified_fields: Vec<Field> = strategies
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(field, _)| *field)
        .collect();
    let html_fragments = probe::capture_fragments(document, &verified_fields).await;

    // Narrative annotation. Verified evidence always takes precedence; an
    // oracle failure costs the narrative, not the record.
    let prompt = build_annotation_prompt(
        profile,
        &strategies,
        &interaction,
        &html_fragments,
        modal_present,
    );
    let annotation = match oracle.complete(ANNOTATION_SYSTEM_PROMPT, &prompt).await {
        Ok(response) => parse_annotation(&response),
        Err(e) => {
            tracing::warn!(error = %e, "annotation failed, keeping verified evidence only");
            Annotation::default()
        }
    };

    let low_quality = verified_fields.is_empty();
    if low_quality {
        tracing::warn!("no field has a working strategy; record flagged low-quality");
    }

    Ok(DiscoveryRecord {
        record_id,
        url: url.to_string(),
        canonical_url,
        site: profile.id,
        strategies,
        interaction,
        html_fragments,
        observations: annotation.observations,
        edge_cases: annotation.edge_cases,
        wait_hints: annotation.wait_hints.unwrap_or_default(),
        low_quality,
        timestamp: Utc::now(),
        schema_version: RECORD_SCHEMA_VERSION.to_string(),
    })
}
