//! Error types for the bgx-core library.

use thiserror::Error;

/// Main error type for the bgx library.
#[derive(Error, Debug)]
pub enum BgxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Country lookup error.
    #[error("geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract images from PDF.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine (binary or models) is not available.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),
}

/// Errors related to field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Nothing readable came out of the document.
    #[error("no text extracted from document")]
    NoText,
}

/// Errors from the geocoding service.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// No API key configured.
    #[error("no geocoding API key configured (set OPENCAGE_API_KEY)")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Service answered with an error status.
    #[error("service returned status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Errors while writing output files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Building the docx package failed.
    #[error("docx packaging failed: {0}")]
    Docx(String),

    /// CSV writing failed.
    #[error("CSV writing failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for the bgx library.
pub type Result<T> = std::result::Result<T, BgxError>;
