//! Rule-based field extractors for bank guarantees.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod parties;
pub mod patterns;
pub mod reference;

pub use amounts::{format_indian_amount, parse_grouped_amount, AmountExtractor, AmountInWordsExtractor};
pub use currency::CurrencyExtractor;
pub use dates::{extract_dates, parse_date, DateKind, GuaranteeDates, LabeledDateExtractor};
pub use parties::{AddressExtractor, ApplicantNameExtractor, BeneficiaryNameExtractor, CountryLabelExtractor, Party};
pub use reference::{BgNumberExtractor, IssuingBankExtractor};

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range of the match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Run `pattern` and collect trimmed, non-empty captures of group 1.
pub(crate) fn capture_text(
    pattern: &Regex,
    text: &str,
    confidence: f32,
) -> Vec<ExtractionMatch<String>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let value = tidy(caps.get(1)?.as_str());
            if value.is_empty() {
                return None;
            }
            Some(ExtractionMatch::new(value, confidence, full.as_str()).with_position(full.start(), full.end()))
        })
        .collect()
}

/// Trim and collapse inner whitespace.
pub(crate) fn tidy(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Values in first-seen order with duplicates removed.
pub fn unique_values<T: PartialEq>(matches: impl IntoIterator<Item = ExtractionMatch<T>>) -> Vec<T> {
    let mut values: Vec<T> = Vec::new();
    for m in matches {
        if !values.contains(&m.value) {
            values.push(m.value);
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy() {
        assert_eq!(tidy("  Oil   India \n Limited "), "Oil India Limited");
    }

    #[test]
    fn test_unique_values_keeps_first_seen_order() {
        let matches = vec![
            ExtractionMatch::new("USD", 0.9, ""),
            ExtractionMatch::new("INR", 0.9, ""),
            ExtractionMatch::new("USD", 0.9, ""),
        ];
        assert_eq!(unique_values(matches), vec!["USD", "INR"]);
    }

    #[test]
    fn test_capture_text_skips_empty() {
        let re = Regex::new(r"Country:\s*(.*?)\s*,").unwrap();
        let found = capture_text(&re, "Country: , Country: India ,", 0.9);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "India");
        assert!(found[0].position.is_some());
    }
}
