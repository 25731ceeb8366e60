//! Bank guarantee data model.
//!
//! Field names serialize to the human-readable labels used in the
//! `*_extracted_data.json` files, in a fixed order. A field that no rule
//! matched is `null`; list fields never serialize as empty arrays.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::guarantee::rules::format_indian_amount;

/// Display value for a field that was not matched.
pub const NOT_FOUND: &str = "Not Found";

/// Fields extracted from a bank guarantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeRecord {
    /// Party in whose favour the guarantee is issued.
    #[serde(rename = "Beneficiary Name")]
    pub beneficiary_name: Option<String>,

    /// Applicant (bidder / M/s) names.
    #[serde(rename = "Applicant Name")]
    pub applicant_names: Option<Vec<String>>,

    /// BG reference numbers.
    #[serde(rename = "BG Number")]
    pub bg_numbers: Option<Vec<String>>,

    /// Last dates for lodging a claim ("i.e. DD/MM/YYYY").
    #[serde(rename = "Claim Date")]
    pub claim_dates: Option<Vec<NaiveDate>>,

    /// Validity end dates ("till DD/MM/YYYY").
    #[serde(rename = "Expiry Date")]
    pub expiry_dates: Option<Vec<NaiveDate>>,

    /// ISO currency codes mentioned.
    #[serde(rename = "Currency")]
    pub currencies: Option<Vec<String>>,

    /// Issuance dates.
    #[serde(rename = "Issue Date")]
    pub issue_dates: Option<Vec<NaiveDate>>,

    /// Labelled beneficiary country.
    #[serde(rename = "Beneficiary Country")]
    pub beneficiary_countries: Option<Vec<String>>,

    /// Labelled applicant country.
    #[serde(rename = "Applicant Country")]
    pub applicant_countries: Option<Vec<String>>,

    /// Bank the guarantee is made by.
    #[serde(rename = "Issuing Bank Name")]
    pub issuing_banks: Option<Vec<String>>,

    /// Amount written out in words ("Rupees ... only").
    #[serde(rename = "BG Amount (in Words)")]
    pub amounts_in_words: Option<Vec<String>>,

    /// Amounts written as grouped numbers. Serialized as exact decimal
    /// strings (`"1000000.00"`), never as floats.
    #[serde(rename = "BG Amount (in Numbers)")]
    pub amounts: Option<Vec<Decimal>>,

    /// Applicant registered office addresses.
    #[serde(rename = "Applicant Address")]
    pub applicant_addresses: Option<Vec<String>>,

    /// Labelled beneficiary addresses.
    #[serde(rename = "Beneficiary Address")]
    pub beneficiary_addresses: Option<Vec<String>>,
}

/// Turn an empty list into `None`.
pub fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}

fn display_list<T: ToString>(values: &Option<Vec<T>>) -> String {
    match values {
        Some(v) => v.iter().map(|x| x.to_string()).collect::<Vec<_>>().join("; "),
        None => NOT_FOUND.to_string(),
    }
}

fn display_amounts(values: &Option<Vec<Decimal>>) -> String {
    match values {
        Some(v) => v.iter().map(|a| format_indian_amount(*a)).collect::<Vec<_>>().join("; "),
        None => NOT_FOUND.to_string(),
    }
}

fn display_dates(values: &Option<Vec<NaiveDate>>) -> String {
    match values {
        Some(v) => v
            .iter()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .collect::<Vec<_>>()
            .join("; "),
        None => NOT_FOUND.to_string(),
    }
}

impl GuaranteeRecord {
    /// Field labels in output order.
    pub const LABELS: [&'static str; 14] = [
        "Beneficiary Name",
        "Applicant Name",
        "BG Number",
        "Claim Date",
        "Expiry Date",
        "Currency",
        "Issue Date",
        "Beneficiary Country",
        "Applicant Country",
        "Issuing Bank Name",
        "BG Amount (in Words)",
        "BG Amount (in Numbers)",
        "Applicant Address",
        "Beneficiary Address",
    ];

    /// `(label, display value)` pairs in output order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.beneficiary_name
                .clone()
                .unwrap_or_else(|| NOT_FOUND.to_string()),
            display_list(&self.applicant_names),
            display_list(&self.bg_numbers),
            display_dates(&self.claim_dates),
            display_dates(&self.expiry_dates),
            display_list(&self.currencies),
            display_dates(&self.issue_dates),
            display_list(&self.beneficiary_countries),
            display_list(&self.applicant_countries),
            display_list(&self.issuing_banks),
            display_list(&self.amounts_in_words),
            display_amounts(&self.amounts),
            display_list(&self.applicant_addresses),
            display_list(&self.beneficiary_addresses),
        ];

        Self::LABELS.into_iter().zip(values).collect()
    }

    /// Labels of fields that were not matched.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let matched = [
            self.beneficiary_name.is_some(),
            self.applicant_names.is_some(),
            self.bg_numbers.is_some(),
            self.claim_dates.is_some(),
            self.expiry_dates.is_some(),
            self.currencies.is_some(),
            self.issue_dates.is_some(),
            self.beneficiary_countries.is_some(),
            self.applicant_countries.is_some(),
            self.issuing_banks.is_some(),
            self.amounts_in_words.is_some(),
            self.amounts.is_some(),
            self.applicant_addresses.is_some(),
            self.beneficiary_addresses.is_some(),
        ];

        Self::LABELS
            .into_iter()
            .zip(matched)
            .filter(|(_, matched)| !matched)
            .map(|(label, _)| label)
            .collect()
    }

    /// True when no rule matched at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Largest numeric amount, which is usually the guarantee amount.
    pub fn principal_amount(&self) -> Option<Decimal> {
        self.amounts.as_ref()?.iter().max().copied()
    }

    /// Latest expiry date.
    pub fn latest_expiry(&self) -> Option<NaiveDate> {
        self.expiry_dates.as_ref()?.iter().max().copied()
    }

    /// Consistency checks between extracted fields.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let issued = self.issue_dates.as_ref().and_then(|d| d.iter().min().copied());
        let expiry = self.latest_expiry();
        let claim = self.claim_dates.as_ref().and_then(|d| d.iter().max().copied());

        if let (Some(issued), Some(expiry)) = (issued, expiry) {
            if expiry < issued {
                issues.push(format!(
                    "Expiry date {} is before issue date {}",
                    expiry.format("%d/%m/%Y"),
                    issued.format("%d/%m/%Y")
                ));
            }
        }

        if let (Some(claim), Some(expiry)) = (claim, expiry) {
            if claim < expiry {
                issues.push(format!(
                    "Claim date {} is before expiry date {}",
                    claim.format("%d/%m/%Y"),
                    expiry.format("%d/%m/%Y")
                ));
            }
        }

        if self.principal_amount().is_some_and(|amount| amount.is_zero()) {
            issues.push("Zero guarantee amount".to_string());
        }

        issues
    }
}

/// How a country was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountrySource {
    /// A country name written in the address.
    CountryName,
    /// A known city or state mapped to its country.
    City,
    /// Answer from the geocoding service.
    Geocoder,
}

/// A country resolved from an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCountry {
    /// Country name.
    pub country: String,
    /// How it was found.
    pub source: CountrySource,
    /// Address it was resolved from.
    pub address: String,
}

/// Countries filled in from addresses when the document had no label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCountries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary: Option<ResolvedCountry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ResolvedCountry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let record = GuaranteeRecord {
            beneficiary_name: Some("Oil India Limited".to_string()),
            ..GuaranteeRecord::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Beneficiary Name"], "Oil India Limited");
        assert!(json["BG Number"].is_null());
        assert!(json["BG Amount (in Numbers)"].is_null());
    }

    #[test]
    fn test_json_keys_in_label_order() {
        let json = serde_json::to_string(&GuaranteeRecord::default()).unwrap();
        let mut last = 0;
        for label in GuaranteeRecord::LABELS {
            let pos = json.find(&format!("\"{}\"", label)).unwrap();
            assert!(pos >= last, "{} out of order", label);
            last = pos;
        }
    }

    #[test]
    fn test_entries_display() {
        let record = GuaranteeRecord {
            expiry_dates: Some(vec![NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()]),
            currencies: Some(vec!["INR".to_string(), "USD".to_string()]),
            ..GuaranteeRecord::default()
        };

        let entries = record.entries();
        assert_eq!(entries.len(), 14);
        assert_eq!(entries[4], ("Expiry Date", "31/03/2025".to_string()));
        assert_eq!(entries[5], ("Currency", "INR; USD".to_string()));
        assert_eq!(entries[0], ("Beneficiary Name", NOT_FOUND.to_string()));
    }

    #[test]
    fn test_amounts_display_and_json() {
        let record = GuaranteeRecord {
            amounts: Some(vec![
                Decimal::from_str("1000000.00").unwrap(),
                Decimal::from_str("25000").unwrap(),
            ]),
            ..GuaranteeRecord::default()
        };

        assert_eq!(record.entries()[11], ("BG Amount (in Numbers)", "10,00,000.00; 25,000.00".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["BG Amount (in Numbers)"][0], "1000000.00");
    }

    #[test]
    fn test_not_found_text_is_still_a_value() {
        let record = GuaranteeRecord {
            beneficiary_name: Some(NOT_FOUND.to_string()),
            ..GuaranteeRecord::default()
        };
        assert!(!record.missing_fields().contains(&"Beneficiary Name"));
        assert_eq!(record.missing_fields().len(), 13);
    }

    #[test]
    fn test_missing_fields_and_principal() {
        let record = GuaranteeRecord {
            amounts: Some(vec![
                Decimal::from_str("50000").unwrap(),
                Decimal::from_str("1000000.00").unwrap(),
            ]),
            ..GuaranteeRecord::default()
        };

        assert_eq!(record.missing_fields().len(), 13);
        assert!(!record.is_empty());
        assert_eq!(record.principal_amount(), Some(Decimal::from_str("1000000.00").unwrap()));
        assert!(GuaranteeRecord::default().is_empty());
    }

    #[test]
    fn test_validate_date_order() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let mut record = GuaranteeRecord {
            issue_dates: Some(vec![ymd(2024, 1, 15)]),
            expiry_dates: Some(vec![ymd(2025, 3, 31)]),
            claim_dates: Some(vec![ymd(2025, 4, 30)]),
            ..GuaranteeRecord::default()
        };
        assert!(record.validate().is_empty());

        record.expiry_dates = Some(vec![ymd(2023, 12, 31)]);
        let issues = record.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].starts_with("Expiry date 31/12/2023"));
    }

    #[test]
    fn test_validate_zero_principal() {
        let mut record = GuaranteeRecord {
            amounts: Some(vec![Decimal::ZERO]),
            ..GuaranteeRecord::default()
        };
        assert_eq!(record.validate(), vec!["Zero guarantee amount".to_string()]);

        record.amounts = Some(vec![Decimal::ZERO, Decimal::from_str("50000").unwrap()]);
        assert!(record.validate().is_empty());
    }
}
