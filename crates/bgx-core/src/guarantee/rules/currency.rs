//! Currency detection.

use super::patterns::{CURRENCY_CODE, RUPEE_MARKER};
use super::{ExtractionMatch, FieldExtractor};

/// Currency code extractor.
///
/// ISO codes are reported upper-cased; `Rs`, `Rupees` and `₹` count as `INR`.
/// Matches come back in text order.
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let codes = CURRENCY_CODE.find_iter(text).map(|m| {
            ExtractionMatch::new(m.as_str().to_uppercase(), 0.95, m.as_str())
                .with_position(m.start(), m.end())
        });
        let rupees = RUPEE_MARKER.find_iter(text).map(|m| {
            ExtractionMatch::new("INR".to_string(), 0.85, m.as_str())
                .with_position(m.start(), m.end())
        });

        let mut matches: Vec<_> = codes.chain(rupees).collect();
        matches.sort_by_key(|m| m.position.map(|(start, _)| start).unwrap_or(0));
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guarantee::rules::unique_values;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_iso_codes_uppercased() {
        let found = unique_values(CurrencyExtractor::new().extract_all("amount in usd and EUR"));
        assert_eq!(found, vec!["USD", "EUR"]);
    }

    #[test]
    fn test_rupee_markers() {
        let text = "Rs .10 ,00 ,000 (Rupees Ten Lakh only) or ₹ 500";
        let found = CurrencyExtractor::new().extract_all(text);
        assert_eq!(found.len(), 3);
        assert_eq!(unique_values(found), vec!["INR"]);
    }

    #[test]
    fn test_text_order() {
        let found = unique_values(CurrencyExtractor::new().extract_all("Rs . 100 or GBP 5"));
        assert_eq!(found, vec!["INR", "GBP"]);
    }

    #[test]
    fn test_code_inside_word_ignored() {
        assert!(CurrencyExtractor::new().extract_all("MINRAL EUROPA").is_empty());
    }
}
