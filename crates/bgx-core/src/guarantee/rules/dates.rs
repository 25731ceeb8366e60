//! Date extraction for bank guarantees.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{CLAIM_DATE, EXPIRY_DATE, ISSUE_DATE};
use super::{ExtractionMatch, FieldExtractor, unique_values};

/// Parse a day-first date such as `31/03/2025`, `31-3-2025` or `31 .03 .2025`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = compact.split(['-', '/', '.']);

    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn dates_from(pattern: &Regex, text: &str, confidence: f32) -> Vec<ExtractionMatch<NaiveDate>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let date = parse_date(caps.get(1)?.as_str())?;
            Some(ExtractionMatch::new(date, confidence, full.as_str()).with_position(full.start(), full.end()))
        })
        .collect()
}

/// Which labeled date to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Last date for lodging a claim ("i.e. 30/04/2025").
    Claim,
    /// End of validity ("till 31/03/2025").
    Expiry,
    /// Date of issuance.
    Issue,
}

/// Extractor for a date introduced by a label.
pub struct LabeledDateExtractor {
    kind: DateKind,
}

impl LabeledDateExtractor {
    pub fn new(kind: DateKind) -> Self {
        Self { kind }
    }

    fn pattern(&self) -> &'static Regex {
        match self.kind {
            DateKind::Claim => &*CLAIM_DATE,
            DateKind::Expiry => &*EXPIRY_DATE,
            DateKind::Issue => &*ISSUE_DATE,
        }
    }
}

impl FieldExtractor for LabeledDateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        dates_from(self.pattern(), text, 0.9)
    }
}

/// Labeled dates found in a guarantee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuaranteeDates {
    pub claim: Vec<NaiveDate>,
    pub expiry: Vec<NaiveDate>,
    pub issue: Vec<NaiveDate>,
}

/// Extract all labeled dates.
///
/// Claim and expiry dates keep every occurrence; issue dates are deduplicated.
pub fn extract_dates(text: &str) -> GuaranteeDates {
    let values = |kind| {
        LabeledDateExtractor::new(kind)
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect::<Vec<_>>()
    };

    GuaranteeDates {
        claim: values(DateKind::Claim),
        expiry: values(DateKind::Expiry),
        issue: unique_values(LabeledDateExtractor::new(DateKind::Issue).extract_all(text)),
    }
}
