//! Rule-based guarantee parser.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::guarantee::{GuaranteeRecord, non_empty};
use crate::text::clean_text;

use super::Result;
use super::rules::{
    AddressExtractor, AmountExtractor, AmountInWordsExtractor, ApplicantNameExtractor,
    BeneficiaryNameExtractor, BgNumberExtractor, CountryLabelExtractor, CurrencyExtractor, ExtractionMatch,
    FieldExtractor, IssuingBankExtractor, Party, extract_dates, unique_values,
};

/// Result of guarantee extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: GuaranteeRecord,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for guarantee parsing.
pub trait GuaranteeParser {
    /// Parse guarantee fields from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Parser that runs the fixed set of field rules.
pub struct RuleBasedParser {
    /// Run `clean_text` on the input first.
    clean: bool,
}

impl RuleBasedParser {
    /// Create a parser that cleans its input.
    pub fn new() -> Self {
        Self { clean: true }
    }

    /// Set input cleaning. Turn it off when the text is already cleaned.
    pub fn with_cleaning(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

fn strings<E>(extractor: &E, text: &str) -> Option<Vec<String>>
where
    E: FieldExtractor<Output = ExtractionMatch<String>>,
{
    non_empty(unique_values(extractor.extract_all(text)))
}

fn all_strings<E>(extractor: &E, text: &str) -> Option<Vec<String>>
where
    E: FieldExtractor<Output = ExtractionMatch<String>>,
{
    non_empty(extractor.extract_all(text).into_iter().map(|m| m.value).collect())
}

/// Run every field rule over `text`.
///
/// Lists keep every match except where duplicates carry no information
/// (applicant names, BG numbers, currencies, issue dates, amounts).
pub(crate) fn build_record(text: &str) -> GuaranteeRecord {
    let dates = extract_dates(text);

    GuaranteeRecord {
        beneficiary_name: BeneficiaryNameExtractor::new().extract(text).map(|m| m.value),
        applicant_names: strings(&ApplicantNameExtractor::new(), text),
        bg_numbers: strings(&BgNumberExtractor::new(), text),
        claim_dates: non_empty(dates.claim),
        expiry_dates: non_empty(dates.expiry),
        currencies: strings(&CurrencyExtractor::new(), text),
        issue_dates: non_empty(dates.issue),
        beneficiary_countries: all_strings(&CountryLabelExtractor::new(Party::Beneficiary), text),
        applicant_countries: all_strings(&CountryLabelExtractor::new(Party::Applicant), text),
        issuing_banks: all_strings(&IssuingBankExtractor::new(), text),
        amounts_in_words: strings(&AmountInWordsExtractor::new(), text),
        amounts: non_empty(unique_values(AmountExtractor::new().extract_all(text))),
        applicant_addresses: all_strings(&AddressExtractor::new(Party::Applicant), text),
        beneficiary_addresses: all_strings(&AddressExtractor::new(Party::Beneficiary), text),
    }
}

impl GuaranteeParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        let cleaned;
        let text = if self.clean {
            cleaned = clean_text(text);
            cleaned.as_str()
        } else {
            text.trim()
        };

        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }

        info!("Parsing guarantee from {} characters of text", text.len());

        let record = build_record(text);

        let mut warnings = Vec::new();
        if record.beneficiary_name.is_none() {
            warnings.push("Could not extract beneficiary name".to_string());
        }
        if record.applicant_names.is_none() {
            warnings.push("Could not extract applicant name".to_string());
        }
        if record.bg_numbers.is_none() {
            warnings.push("Could not extract BG number".to_string());
        }
        if record.amounts.is_none() {
            warnings.push("Could not extract BG amount".to_string());
        }
        warnings.extend(record.validate());

        debug!(
            "Extracted {} of {} fields",
            GuaranteeRecord::LABELS.len() - record.missing_fields().len(),
            GuaranteeRecord::LABELS.len()
        );

        Ok(ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE: &str = "BANK GUARANTEE BG No.0012BG2024/567
Issuance Date: 15/01/2024
To, Oil India Limited, Duliajan, Assam
In consideration of Oil India Limited having agreed to exempt M/s. Grant Infra Projects Pvt Ltd, \
having its registered office at Grant House, 2nd Floor, Uppal Hyderabad 500013 India. \
(hereinafter called the Applicant) from the demand of security deposit, we, State Bank of India \
do hereby undertake to pay an amount not exceeding Rs.10,00,000.00 (Rupees Ten Lakh only) \
against any loss. This guarantee shall remain valid till 31/03/2025 and claims may be lodged \
within 30 days thereafter i.e. 30/04/2025.
Beneficiary Country: India.
Applicant Country: India.
Beneficiary Address: Duliajan, Assam 786602.
This guarantee is made by State Bank of India, Mumbai Main Branch.";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_sample_guarantee() {
        let result = RuleBasedParser::new().parse(SAMPLE).unwrap();
        let record = result.record;

        assert_eq!(record.beneficiary_name.as_deref(), Some("Oil India Limited"));
        assert_eq!(record.applicant_names, Some(vec!["Grant Infra Projects Pvt Ltd".to_string()]));
        assert_eq!(record.bg_numbers, Some(vec!["0012BG2024/567".to_string()]));
        assert_eq!(record.issue_dates, Some(vec![ymd(2024, 1, 15)]));
        assert_eq!(record.expiry_dates, Some(vec![ymd(2025, 3, 31)]));
        assert_eq!(record.claim_dates, Some(vec![ymd(2025, 4, 30)]));
        assert_eq!(record.currencies, Some(vec!["INR".to_string()]));
        assert_eq!(record.amounts, Some(vec![Decimal::from_str("1000000.00").unwrap()]));
        assert_eq!(record.amounts_in_words, Some(vec!["Ten Lakh".to_string()]));
        assert_eq!(record.issuing_banks, Some(vec!["State Bank of India".to_string()]));
        assert_eq!(record.beneficiary_countries, Some(vec!["India".to_string()]));
        assert_eq!(record.applicant_countries, Some(vec!["India".to_string()]));
        assert_eq!(
            record.applicant_addresses,
            Some(vec!["Grant House , 2nd Floor , Uppal Hyderabad 500013 India".to_string()])
        );
        assert_eq!(
            record.beneficiary_addresses,
            Some(vec!["Duliajan , Assam 786602".to_string()])
        );

        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_warnings_for_missing_key_fields() {
        let result = RuleBasedParser::new()
            .parse("Performance guarantee valid till 31/03/2025.")
            .unwrap();

        assert_eq!(
            result.warnings,
            vec![
                "Could not extract beneficiary name",
                "Could not extract applicant name",
                "Could not extract BG number",
                "Could not extract BG amount",
            ]
        );
        assert_eq!(result.record.expiry_dates, Some(vec![ymd(2025, 3, 31)]));
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let err = RuleBasedParser::new().parse(" \n ").unwrap_err();
        assert!(matches!(err, ExtractionError::NoText));
    }

    #[test]
    fn test_without_cleaning_uses_text_as_is() {
        let result = RuleBasedParser::new()
            .with_cleaning(false)
            .parse("BG No : 4455/2024 , Rs . 2,50,000")
            .unwrap();
        assert_eq!(result.record.bg_numbers, Some(vec!["4455/2024".to_string()]));
        assert_eq!(result.record.amounts, Some(vec![Decimal::from_str("250000").unwrap()]));
    }
}
