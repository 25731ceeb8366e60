//! Bank guarantee field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, GuaranteeParser, RuleBasedParser};

use crate::error::ExtractionError;
use crate::models::guarantee::GuaranteeRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Run every field rule over already cleaned text.
///
/// Fields with no match are `None`; this never fails, even on empty input.
pub fn extract_entities(text: &str) -> GuaranteeRecord {
    parser::build_record(text)
}
