//! Beneficiary and applicant extraction: names, addresses, country labels.

use regex::Regex;

use super::patterns::{
    APPLICANT_ADDRESS_START, APPLICANT_COUNTRY, APPLICANT_NAME, BENEFICIARY_ADDRESS,
    BENEFICIARY_COUNTRY, BENEFICIARY_IN_FAVOUR, BENEFICIARY_SALUTATION, BENEFICIARY_TO,
};
use super::{ExtractionMatch, FieldExtractor, capture_text, tidy};

/// Party to a guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Beneficiary,
    Applicant,
}

/// Beneficiary name extractor.
///
/// The leftmost `in favour of` or `To` match wins. Where the `To ,`
/// salutation and a bare `To` start at the same place, the salutation
/// (higher confidence) is kept.
pub struct BeneficiaryNameExtractor {
    passes: Vec<(&'static Regex, f32)>,
}

impl BeneficiaryNameExtractor {
    pub fn new() -> Self {
        Self {
            passes: vec![
                (&*BENEFICIARY_IN_FAVOUR, 0.95),
                (&*BENEFICIARY_SALUTATION, 0.85),
                (&*BENEFICIARY_TO, 0.5),
            ],
        }
    }
}

impl Default for BeneficiaryNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BeneficiaryNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut found: Vec<_> = self
            .passes
            .iter()
            .flat_map(|(pattern, confidence)| capture_text(pattern, text, *confidence))
            .collect();

        found.sort_by_key(|m| m.position.map(|(start, _)| start));
        found.dedup_by_key(|m| m.position.map(|(start, _)| start));
        found
    }
}

/// Applicant name extractor (`M/s`, `Applicant Name`, `Bidder`).
pub struct ApplicantNameExtractor;

impl ApplicantNameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ApplicantNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ApplicantNameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_text(&APPLICANT_NAME, text, 0.8)
    }
}

/// Words that take a dot without ending a sentence (`Plot No. 12`).
const ABBREVIATIONS: &[&str] = &[
    "no", "nos", "pvt", "co", "rd", "st", "opp", "nr", "dist", "tal", "dr", "shri", "smt", "bldg", "ph",
];

/// Byte offset where the first sentence of cleaned `text` ends.
///
/// A sentence ends at ` .` followed by the end of text, or by whitespace and
/// then a capital letter or `(`. Dots after a single letter (`M .G .`) or a
/// known abbreviation do not count.
fn sentence_end(text: &str) -> usize {
    for (i, _) in text.match_indices(" .") {
        let rest = &text[i + 2..];
        let next = rest.trim_start();
        if next.is_empty() {
            return i;
        }
        if next.len() == rest.len() || !next.starts_with(|c: char| c.is_uppercase() || c == '(') {
            continue;
        }

        let word = text[..i]
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .trim_start_matches('.');
        if word.chars().count() <= 1 || ABBREVIATIONS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        return i;
    }
    text.len()
}

/// `M/s <name>, ... at <address>` up to the end of the sentence.
fn applicant_addresses(text: &str) -> Vec<ExtractionMatch<String>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(lead) = APPLICANT_ADDRESS_START.find_at(text, pos) {
        let end = lead.end() + sentence_end(&text[lead.end()..]);
        let value = tidy(&text[lead.end()..end]);
        if !value.is_empty() {
            found.push(
                ExtractionMatch::new(value, 0.7, &text[lead.start()..end]).with_position(lead.start(), end),
            );
        }
        pos = end;
    }

    found
}

/// Address extractor for one party.
pub struct AddressExtractor {
    party: Party,
}

impl AddressExtractor {
    pub fn new(party: Party) -> Self {
        Self { party }
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        match self.party {
            Party::Applicant => applicant_addresses(text),
            Party::Beneficiary => capture_text(&BENEFICIARY_ADDRESS, text, 0.9),
        }
    }
}

/// Explicit `Beneficiary Country:` / `Applicant Country:` labels.
pub struct CountryLabelExtractor {
    party: Party,
}

impl CountryLabelExtractor {
    pub fn new(party: Party) -> Self {
        Self { party }
    }
}

impl FieldExtractor for CountryLabelExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let pattern: &Regex = match self.party {
            Party::Beneficiary => &*BENEFICIARY_COUNTRY,
            Party::Applicant => &*APPLICANT_COUNTRY,
        };
        capture_text(pattern, text, 0.95)
    }
}
