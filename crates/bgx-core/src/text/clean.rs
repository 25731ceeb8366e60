//! Cleanup of PDF and OCR text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CAMEL_JOIN: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    static ref TIGHT_PUNCT: Regex = Regex::new(r"([a-zA-Z0-9])([,.!?;])").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs to one space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Split glued words and punctuation, then normalize whitespace.
///
/// Text layers of scanned guarantees often lose spaces (`PerformanceBank`),
/// so a space goes between a lowercase letter and the following capital,
/// and between an alphanumeric and the `, . ! ? ;` right after it.
/// Field rules are written to tolerate that inserted space (`i .e .`).
pub fn clean_text(text: &str) -> String {
    let text = CAMEL_JOIN.replace_all(text, "${1} ${2}");
    let text = TIGHT_PUNCT.replace_all(&text, "${1} ${2}");
    normalize_whitespace(&text)
}
