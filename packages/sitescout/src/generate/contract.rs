//! Structural and lexical contract on oracle-returned artifacts.
//!
//! Two clauses are hard failures: the source must pass a coarse validity
//! scan, and it must invoke the scripted-evaluation capability. Everything
//! else (record-specific values, entry points, tooling imports, fragile
//! patterns) is a warning — the oracle may legitimately structure things
//! differently.

use regex::Regex;

use crate::error::{Result, ScoutError};
use crate::sites::SiteId;

/// Entry points the artifact is expected to expose.
pub fn required_entry_points(site: SiteId) -> [String; 5] {
    [
        "sanitize_filename".to_string(),
        "extract_job_id".to_string(),
        format!("scrape_{site}_job"),
        "format_job_description".to_string(),
        "main".to_string(),
    ]
}

/// Import prefixes an artifact must not carry; the generated program has
/// to run with no oracle or tooling dependencies.
const FORBIDDEN_IMPORTS: [&str; 2] = ["anthropic", "mcp"];

/// Non-fatal findings from a contract check.
#[derive(Debug, Clone, Default)]
pub struct ContractReport {
    pub warnings: Vec<String>,
}

/// Pull source text out of an oracle response: language-tagged fence,
/// then any fence, then the whole response.
pub fn extract_source(response: &str) -> String {
    let tagged = Regex::new(r"(?s)```python\s*(.*?)\s*```").expect("static fence pattern");
    if let Some(caps) = tagged.captures(response) {
        return caps[1].to_string();
    }
    let plain = Regex::new(r"(?s)```\s*(.*?)\s*```").expect("static fence pattern");
    if let Some(caps) = plain.captures(response) {
        return caps[1].to_string();
    }
    response.trim().to_string()
}

/// Enforce the artifact contract.
///
/// Hard failures return [`ScoutError::ContractViolation`]; soft findings
/// come back as warnings.
pub fn check_contract(source: &str, site: SiteId, record_id: &str) -> Result<ContractReport> {
    if let Some(reason) = scan_source(source) {
        return Err(ScoutError::ContractViolation { reason });
    }

    if !source.contains("page.evaluate(") {
        return Err(ScoutError::ContractViolation {
            reason: "artifact does not invoke page.evaluate() for data extraction".to_string(),
        });
    }

    let mut report = ContractReport::default();

    if !record_id.is_empty() && source.contains(record_id) {
        report.warnings.push(format!(
            "artifact embeds the record-specific identifier {record_id}"
        ));
    }

    let defined = defined_functions(source);
    let missing: Vec<String> = required_entry_points(site)
        .into_iter()
        .filter(|name| !defined.contains(name))
        .collect();
    if !missing.is_empty() {
        report
            .warnings
            .push(format!("missing entry points: {}", missing.join(", ")));
    }

    for import in forbidden_imports(source) {
        report
            .warnings
            .push(format!("artifact imports tooling library: {import}"));
    }

    if source.contains("page.wait_for_selector(") && source.contains("for selector in") {
        report
            .warnings
            .push("artifact uses a selector-loop pattern for extraction".to_string());
    }

    Ok(report)
}

/// Coarse source-validity scan: non-empty, balanced delimiters outside
/// strings and comments, no unterminated string at end of input.
///
/// Deliberately textual — full parsing of generated code is out of scope.
fn scan_source(source: &str) -> Option<String> {
    if source.trim().is_empty() {
        return Some("artifact source is empty".to_string());
    }
    if !source.contains("def ") {
        return Some("artifact source defines no functions".to_string());
    }

    let mut depth: i64 = 0;
    let mut in_string: Option<char> = None;
    let mut triple = false;
    let mut chars = source.chars().peekable();
    let mut prev = '\0';

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            if c == quote && prev != '\\' {
                if triple {
                    // Close only on a full triple quote.
                    let mut lookahead = chars.clone();
                    if lookahead.next() == Some(quote) && lookahead.next() == Some(quote) {
                        chars.next();
                        chars.next();
                        in_string = None;
                        triple = false;
                    }
                } else {
                    in_string = None;
                }
            }
        } else {
            match c {
                '#' => {
                    for nc in chars.by_ref() {
                        if nc == '\n' {
                            break;
                        }
                    }
                }
                '\'' | '"' => {
                    let mut lookahead = chars.clone();
                    if lookahead.next() == Some(c) && lookahead.next() == Some(c) {
                        chars.next();
                        chars.next();
                        triple = true;
                    }
                    in_string = Some(c);
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return Some("unbalanced closing delimiter".to_string());
                    }
                }
                _ => {}
            }
        }
        prev = c;
    }

    if in_string.is_some() {
        return Some("unterminated string literal".to_string());
    }
    if depth != 0 {
        return Some("unbalanced delimiters".to_string());
    }
    None
}

fn defined_functions(source: &str) -> Vec<String> {
    let def = Regex::new(r"(?m)^\s*def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("static def pattern");
    def.captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}

fn forbidden_imports(source: &str) -> Vec<String> {
    let import =
        Regex::new(r"(?m)^\s*(?:import|from)\s+([A-Za-z_][A-Za-z0-9_.]*)").expect("static import pattern");
    import
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .filter(|module| {
            let lower = module.to_lowercase();
            FORBIDDEN_IMPORTS.iter().any(|f| lower.contains(f))
        })
        .collect()
}
