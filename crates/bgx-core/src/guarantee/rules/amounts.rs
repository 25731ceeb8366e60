//! Guarantee amount extraction.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{AMOUNT_IN_WORDS, GROUPED_AMOUNT};
use super::{ExtractionMatch, FieldExtractor, capture_text};

/// Parse a comma-grouped amount such as `10,00,000.00` or `10 ,00 ,000 .00`.
pub fn parse_grouped_amount(s: &str) -> Option<Decimal> {
    let compact: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if compact.is_empty() {
        return None;
    }
    Decimal::from_str(&compact).ok()
}

/// Format with two decimals and Indian digit grouping (`10,00,000.00`).
pub fn format_indian_amount(amount: Decimal) -> String {
    let formatted = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let grouped = if int_part.len() <= 3 {
        int_part.to_string()
    } else {
        let (head, last3) = int_part.split_at(int_part.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), last3)
    };

    format!("{sign}{grouped}.{frac_part}")
}

/// Numeric amount extractor.
///
/// Only comma-grouped numbers count as amounts, which keeps postal codes,
/// years and reference numbers out.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        GROUPED_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let amount = parse_grouped_amount(m.as_str())?;
                Some(ExtractionMatch::new(amount, 0.8, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// Amount written out in words, e.g. `(Rupees Ten Lakh only)`.
pub struct AmountInWordsExtractor;

impl AmountInWordsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountInWordsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountInWordsExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_text(&AMOUNT_IN_WORDS, text, 0.9)
    }
}
