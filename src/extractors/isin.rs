// src/extractors/isin.rs
use once_cell::sync::Lazy;
use regex::Regex;

// ISIN per ISO 6166: two letter country code, nine alphanumeric
// characters, one check digit.
static ISIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]{2}[A-Z0-9]{9}\d").expect("Failed to compile ISIN_RE"));

/// Returns the first ISIN-shaped substring of `input`, or `None`.
/// The match is returned as written; call sites uppercase before storing.
pub fn parse_isin(input: &str) -> Option<&str> {
    ISIN_RE.find(input).map(|m| m.as_str())
}
