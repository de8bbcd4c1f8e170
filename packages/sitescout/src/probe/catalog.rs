//! Built-in strategy catalog.
//!
//! One scripted-evaluation expression per field, tried first, plus ordered
//! structured-query fallbacks. The catalog is global rather than
//! per-profile; the defaults lean on LinkedIn's markup while the fallback
//! selectors stay generic. This module is the seam where per-profile
//! tables would slot in.

use crate::types::strategy::Field;

/// Scripted-evaluation expression for a field.
pub fn eval_expression(field: Field) -> &'static str {
    match field {
        Field::Title => "document.querySelector('h1')?.textContent?.trim()",
        Field::Company => {
            "document.querySelector('a[data-tracking-control-name*=\"topcard\"]')?.textContent?.trim()"
        }
        Field::Location => {
            "document.querySelector('.topcard__flavor--bullet')?.parentElement?.textContent?.match(/\\u00b7\\s*([^\\u00b7]+)/)?.[1]?.trim()"
        }
        Field::Description => {
            "document.querySelector('div.show-more-less-html__markup')?.innerText || document.querySelector('div.show-more-less-html__markup')?.textContent"
        }
    }
}

/// Ordered structured-query fallbacks for a field.
pub fn fallback_selectors(field: Field) -> &'static [&'static str] {
    match field {
        Field::Title => &["h1", "h1.title", "[data-test-id='job-title']", ".job-title"],
        Field::Company => &[
            "a[data-tracking-control-name*='topcard']",
            ".company-name",
            "[data-company-name]",
        ],
        Field::Location => &[".topcard__flavor", ".location", "[data-job-location]"],
        Field::Description => &[
            ".description",
            ".job-description",
            "[class*='description']",
            ".show-more-less-html__markup",
        ],
    }
}

/// Representative selector used when capturing an HTML fragment for a field.
pub fn fragment_selector(field: Field) -> &'static str {
    match field {
        Field::Title => "h1",
        Field::Company => "a[data-tracking-control-name*='topcard']",
        Field::Location => ".topcard__flavor--bullet",
        Field::Description => "div.show-more-less-html__markup",
    }
}

/// Container whose text length measures expansion impact.
pub const EXPANSION_CONTAINER: &str = "div.show-more-less-html__markup";

/// Ordered expansion triggers, first actionable wins.
pub const EXPANSION_TRIGGERS: [&str; 4] = [
    "button[aria-expanded='false']",
    "button:has-text('Show more')",
    ".show-more-less-html__button--more",
    "button[data-tracking-control-name*='show-more']",
];

/// Wrap an expression for evaluation in the document context.
pub fn wrap_expression(expr: &str) -> String {
    format!("() => {{ return {expr}; }}")
}

/// Expression measuring the text length of the expansion container.
pub fn container_length_script() -> String {
    format!(
        "() => {{ const el = document.querySelector('{EXPANSION_CONTAINER}'); return el ? el.textContent.length : 0; }}"
    )
}

/// Expression capturing the outer HTML of a field's representative element.
pub fn fragment_script(field: Field) -> String {
    format!(
        "() => {{ const el = document.querySelector(\"{}\"); return el ? el.outerHTML : null; }}",
        fragment_selector(field)
    )
}
