//! Repair request construction.
//!
//! Pure: prior source + failure signal + the verified strategy bundle in,
//! prompt text out. The retry state machine stays free of formatting
//! concerns, and the oracle narrative never reaches a repair request.

use serde_json::json;

use crate::types::discovery::DiscoveryRecord;

/// Build the repair request for a failed artifact.
pub fn build_repair_request(source: &str, failure: &str, record: &DiscoveryRecord) -> String {
    let working: serde_json::Map<String, serde_json::Value> = record
        .scripted_strategies()
        .into_iter()
        .map(|(field, code)| (field.to_string(), json!(code)))
        .collect();
    let working_json =
        serde_json::to_string_pretty(&serde_json::Value::Object(working)).unwrap_or_default();

    format!(
        "This Playwright scraper failed with this error:\n\n\
         ERROR: {failure}\n\n\
         BROKEN SCRIPT:\n\
         ```python\n\
         {source}\n\
         ```\n\n\
         WORKING JAVASCRIPT STRATEGIES (verified against the live page):\n\
         {working_json}\n\n\
         Fix the script using the WORKING JavaScript strategies above.\n\
         The script MUST use page.evaluate() with the exact JavaScript that worked.\n\
         DO NOT use page.wait_for_selector() loops or CSS selectors for data extraction.\n\n\
         Output the COMPLETE fixed script."
    )
}
