//! Extraction of a JS array-of-objects literal embedded in an HTML page.
//!
//! Two independent stages: [`locate_array_literal`] finds the literal by
//! its variable name, [`normalize_js_literal`] rewrites the non-JSON forms
//! the page emits. [`extract_records`] chains both and decodes the result.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

use crate::error::{ProcessingError, Result};

fn null_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bNull\b").expect("static pattern"))
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("static pattern"))
}

/// Find the array literal assigned to `variable` with `var`, `let` or `const`.
///
/// The match runs lazily to the first `}` followed by `]`, tolerating a
/// trailing comma between them.
pub fn locate_array_literal<'a>(html: &'a str, variable: &str) -> Result<&'a str> {
    let pattern = format!(
        r"(?s)(?:var|let|const)\s+{}\s*=\s*(\[\s*\{{.*?\}}\s*,?\s*\])",
        regex::escape(variable)
    );
    let re = Regex::new(&pattern)?;

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ProcessingError::PayloadNotFound {
            variable: variable.to_string(),
        })
}

/// Rewrite JS-only forms into strict JSON: the `Null` token becomes
/// `null` and commas directly before `}` or `]` are dropped.
pub fn normalize_js_literal(literal: &str) -> String {
    let nulls_fixed = null_token().replace_all(literal, "null");
    trailing_comma().replace_all(&nulls_fixed, "$1").into_owned()
}

/// Locate, normalize and decode the records held in `variable`
pub fn extract_records<T: DeserializeOwned>(html: &str, variable: &str) -> Result<Vec<T>> {
    let literal = locate_array_literal(html, variable)?;
    let json = normalize_js_literal(literal);
    Ok(serde_json::from_str(&json)?)
}
