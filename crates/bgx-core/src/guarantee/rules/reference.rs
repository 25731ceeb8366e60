//! Guarantee number and issuing bank.

use super::patterns::{BG_NUMBER, ISSUING_BANK};
use super::{ExtractionMatch, FieldExtractor, capture_text};

/// BG number extractor.
///
/// Accepts `BG No`, `BGNO` and `BG Number` labels. The token must contain a
/// digit, so `BG No . dated` does not produce `dated`.
pub struct BgNumberExtractor;

impl BgNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BgNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BgNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_text(&BG_NUMBER, text, 0.9)
            .into_iter()
            .filter(|m| m.value.chars().any(|c| c.is_ascii_digit()))
            .map(|mut m| {
                m.value = m.value.trim_end_matches(['/', '-']).to_uppercase();
                m
            })
            .collect()
    }
}

/// Issuing bank from the `made by <bank> ,` clause.
pub struct IssuingBankExtractor;

impl IssuingBankExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IssuingBankExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IssuingBankExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_text(&ISSUING_BANK, text, 0.85)
    }
}
