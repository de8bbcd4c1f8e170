//! Generation request construction.
//!
//! Pure functions: strategy selection and prompt formatting stay out of the
//! orchestrator and the retry machinery.

use indexmap::IndexMap;
use serde_json::json;

use crate::sites::SiteProfile;
use crate::types::discovery::DiscoveryRecord;
use crate::types::strategy::Field;

/// Fallback expressions used in the request when a field has no verified
/// scripted strategy. These keep the request well-formed; the oracle is
/// told which entries were verified.
fn default_expression(field: Field) -> &'static str {
    match field {
        Field::Title => "document.querySelector('h1')?.textContent?.trim()",
        Field::Company => "document.querySelector('.company')?.textContent?.trim()",
        Field::Location => "document.querySelector('.location')?.textContent?.trim()",
        Field::Description => "document.querySelector('.description')?.innerText",
    }
}

/// Scripted expression per field for the generation request.
///
/// Selection order: verified scripted evaluation (preferring high
/// confidence), then the best available structured-query strategy lifted
/// into a querySelector expression, then the generic default.
pub fn request_expressions(record: &DiscoveryRecord) -> IndexMap<Field, String> {
    let mut expressions = record.scripted_strategies();
    for field in Field::ALL {
        if expressions.contains_key(&field) {
            continue;
        }
        let expression = match record.best_strategy(field) {
            Some(best) => format!(
                "document.querySelector(\"{}\")?.textContent?.trim()",
                best.code
            ),
            None => default_expression(field).to_string(),
        };
        expressions.insert(field, expression);
    }
    expressions
}

/// Build the generation request for a discovery record.
pub fn build_generation_request(record: &DiscoveryRecord, profile: &SiteProfile) -> String {
    let expressions = request_expressions(record);
    let interaction_json =
        serde_json::to_string_pretty(&json!(record.interaction)).unwrap_or_default();

    let expansion_note = record
        .interaction
        .selector
        .as_deref()
        .unwrap_or("not required");

    format!(
        "Generate a REUSABLE Playwright scraper for {display_name}.\n\n\
         TESTED JAVASCRIPT STRATEGIES (use these EXACTLY in page.evaluate()):\n\n\
         Title: {title}\n\
         Company: {company}\n\
         Location: {location}\n\
         Description: {description}\n\n\
         Content expansion handling:\n\
         {interaction_json}\n\n\
         CRITICAL REMINDERS:\n\
         1. This script will be used for MANY different {display_name} jobs\n\
         2. Accept job_url as a command-line argument (use argparse)\n\
         3. Extract the job id DYNAMICALLY from the URL (pattern: {id_scheme})\n\
         4. NEVER hardcode job ids, titles, company names, or any job-specific data\n\
         5. MUST use page.evaluate() with the EXACT JavaScript above in a SINGLE call\n\
         6. DO NOT use page.wait_for_selector() or CSS selectors for data extraction\n\n\
         The script should:\n\
         - Use sync_playwright (not async)\n\
         - Combine all field extractions in ONE page.evaluate() call\n\
         - Click the expansion trigger if needed (before evaluate): {expansion_note}\n\
         - Save output to job_descriptions/ with format: {site}_job_{{job_id}}_{{title}}.txt\n\
         - Define scrape_{site}_job as the scraping function\n\
         - Be named {site}_scraper.py (not job-specific)\n\n\
         Output the complete, runnable Python script.",
        display_name = profile.display_name,
        title = expressions[&Field::Title],
        company = expressions[&Field::Company],
        location = expressions[&Field::Location],
        description = expressions[&Field::Description],
        id_scheme = profile.description,
        site = record.site,
    )
}
