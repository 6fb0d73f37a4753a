//! Article code keys.
//!
//! Codes are typed by hand on both sides of a reconciliation, so identity is
//! decided on a collapsed form: whitespace and hyphens removed, uppercased.

use std::sync::OnceLock;

use regex::Regex;

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-]+").expect("static pattern"))
}

fn variant_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d+$").expect("static pattern"))
}

/// Comparison key for an article code. Two codes name the same article
/// iff their keys are equal.
pub fn normalized_key(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    separator_runs().replace_all(code, "").to_uppercase()
}

/// Display/grouping identity: the code with a trailing `.<digits>` variant
/// suffix removed (`"AB-210.130"` → `"AB-210"`). Hyphens are left alone.
pub fn base_article(code: &str) -> String {
    let trimmed = code.trim();
    variant_suffix().replace(trimmed, "").trim_end().to_string()
}
