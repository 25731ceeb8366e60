//! Core library for bank guarantee (BG) document extraction.
//!
//! This crate provides:
//! - PDF processing (text layer and embedded page images)
//! - OCR through Tesseract or PaddleOCR models
//! - Text cleaning and paragraph splitting
//! - Rule-based extraction of BG fields (applicant, beneficiary, amounts, dates, countries)
//! - Country resolution from addresses
//! - Export to text, docx, JSON and CSV

pub mod country;
pub mod error;
pub mod export;
pub mod guarantee;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod text;

pub use error::{BgxError, Result};
pub use guarantee::{extract_entities, ExtractionResult, GuaranteeParser, RuleBasedParser};
pub use models::config::BgxConfig;
pub use models::guarantee::{GuaranteeRecord, ResolvedCountries};
pub use ocr::{create_engine, OcrEngine, OcrResult, TextBox};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use pipeline::{DocumentPipeline, ExtractionMethod, ProcessedDocument, TextSource};
pub use text::{clean_text, split_into_paragraphs};
