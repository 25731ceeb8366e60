//! Regex patterns for bank guarantee extraction.
//!
//! Patterns run on cleaned text, where a space has been inserted before
//! `, . ! ? ;` that followed a letter or digit. Every pattern allows that
//! space (`i .e .`, `10 ,00 ,000`, `M/s .`).

use lazy_static::lazy_static;
use regex::Regex;

/// Day-first date with `-`, `/` or `.` separators, spaces allowed around them.
pub const DATE: &str = r"(\d{1,2}\s?[-/.]\s?\d{1,2}\s?[-/.]\s?\d{4})";

lazy_static! {
    // Beneficiary; the leftmost match wins. `To` is matched case-sensitively.
    pub static ref BENEFICIARY_IN_FAVOUR: Regex = Regex::new(
        r"(?i)\bin\s*favou?r\s*of\s*:?\s*(?:M/s\s*\.?\s*)?([\w\s&'\-]+)"
    ).unwrap();

    pub static ref BENEFICIARY_SALUTATION: Regex = Regex::new(
        r"\bTo\s*,\s*([\w\s&'\-]+)"
    ).unwrap();

    pub static ref BENEFICIARY_TO: Regex = Regex::new(
        r"\bTo\b\s*,?\s*([\w\s&'\-]+)"
    ).unwrap();

    // Applicant
    pub static ref APPLICANT_NAME: Regex = Regex::new(
        r"(?i)(?:\bApplicant(?:\s*Name)?|\bBidder|\bM/s)\s*\.?\s*:?\s*([\w\s&'\-]+?)\s*(?:,|\.|\bhaving\b|\band\b|\bwith\b|$)"
    ).unwrap();

    // Reference numbers
    pub static ref BG_NUMBER: Regex = Regex::new(
        r"(?i)\bBG\s*(?:NO|NUMBER)\b\s*[.:\-]?\s*[.:\-]?\s*([A-Z0-9][A-Z0-9/\-]*)"
    ).unwrap();

    pub static ref ISSUING_BANK: Regex = Regex::new(
        r"(?i)\bmade\s*by\s*(.*?)\s*,"
    ).unwrap();

    // Dates
    pub static ref CLAIM_DATE: Regex = Regex::new(
        &format!(r"(?i)\bi\s*\.\s*e\s*\.?\s*,?\s*{}", DATE)
    ).unwrap();

    pub static ref EXPIRY_DATE: Regex = Regex::new(
        &format!(r"(?i)\b(?:till|up\s*to|upto)\s*(?:and\s*including\s*)?{}", DATE)
    ).unwrap();

    pub static ref ISSUE_DATE: Regex = Regex::new(
        &format!(r"(?i)(?:\bIssuance\s*Date|\bDate\s*of\s*Issue)\s*[:\-]?\s*{}", DATE)
    ).unwrap();

    // Money
    pub static ref CURRENCY_CODE: Regex = Regex::new(
        r"(?i)\b(INR|EUR|USD|GBP)\b"
    ).unwrap();

    pub static ref RUPEE_MARKER: Regex = Regex::new(
        r"(?i)\bRs\b|\bRupees\b|₹"
    ).unwrap();

    pub static ref AMOUNT_IN_WORDS: Regex = Regex::new(
        r"(?i)\(\s*Rupees\s*([A-Za-z\s]+?)\s*only\s*\)"
    ).unwrap();

    /// Comma-grouped number, Indian (10,00,000) or western (1,000,000).
    pub static ref GROUPED_AMOUNT: Regex = Regex::new(
        r"\b(\d{1,3}(?:\s?,\s?\d{2,3}\b)+(?:\s?\.\s?\d{1,2}\b)?)"
    ).unwrap();

    // Countries and addresses
    pub static ref BENEFICIARY_COUNTRY: Regex = Regex::new(
        r"(?i)\bBeneficiary\s*Country\s*:\s*(.*?)\s*[,.\n]"
    ).unwrap();

    pub static ref APPLICANT_COUNTRY: Regex = Regex::new(
        r"(?i)\bApplicant\s*Country\s*:\s*(.*?)\s*[,.\n]"
    ).unwrap();

    /// Lead-in of an applicant address; the address starts at the match end.
    pub static ref APPLICANT_ADDRESS_START: Regex = Regex::new(
        r"(?i)\bM/s\s*\.?\s*[A-Za-z\s,&.]+?,\s*.*?\bat\s+"
    ).unwrap();

    pub static ref BENEFICIARY_ADDRESS: Regex = Regex::new(
        r"(?i)\bBeneficiary\s*Address\s*:\s*(.*?)\s*(?:\.|\n|$)"
    ).unwrap();

    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b(\d{5,6})\b"
    ).unwrap();
}
