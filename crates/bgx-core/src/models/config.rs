//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no geocoding key is configured.
pub const API_KEY_ENV: &str = "OPENCAGE_API_KEY";

/// Main configuration for bgx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BgxConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Geocoding service configuration.
    pub geocoding: GeocodingConfig,

    /// Output files configuration.
    pub output: OutputConfig,

    /// Upload server configuration.
    pub server: ServerConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Try to extract embedded text before falling back to OCR.
    pub prefer_embedded_text: bool,

    /// Minimum non-whitespace characters to consider a PDF text-based.
    pub min_text_length: usize,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            prefer_embedded_text: true,
            min_text_length: 50,
            max_pages: 0,
        }
    }
}

/// OCR engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    /// External `tesseract` executable.
    Tesseract,
    /// PaddleOCR models via pure-onnx-ocr.
    Paddle,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Which engine to run.
    pub engine: OcrEngineKind,

    /// Tesseract executable name or path.
    pub tesseract_cmd: String,

    /// Tesseract language code.
    pub language: String,

    /// Convert page images to grayscale before recognition.
    pub grayscale: bool,

    /// Maximum image dimension (longer side), 0 = no limit.
    pub max_image_size: u32,

    /// Directory containing PaddleOCR model files.
    pub model_dir: PathBuf,

    /// Keep `[UNK]` tokens produced by the recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::Tesseract,
            tesseract_cmd: "tesseract".to_string(),
            language: "eng".to_string(),
            grayscale: true,
            max_image_size: 4096,
            model_dir: PathBuf::from("models"),
            keep_unk: false,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Run OCR on page images instead of reading the text layer.
    pub use_ocr: bool,

    /// Fill missing country fields from the extracted addresses.
    pub resolve_countries: bool,

    /// Ask the geocoding service when resolving countries.
    pub geocode: bool,

    /// Extra place name to country entries for the offline gazetteer.
    pub extra_places: BTreeMap<String, String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            use_ocr: true,
            resolve_countries: true,
            geocode: false,
            extra_places: BTreeMap::new(),
        }
    }
}

/// Geocoding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// OpenCage forward geocoding endpoint.
    pub endpoint: String,

    /// API key; falls back to `OPENCAGE_API_KEY`.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.opencagedata.com/geocode/v1/json".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl GeocodingConfig {
    /// Configured key, or the one from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }
}

/// Output files configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated files.
    pub output_dir: PathBuf,

    /// Write the cleaned text to `<stem>.txt`.
    pub save_text: bool,

    /// Write paragraphs to `<stem>.docx`.
    pub save_docx: bool,

    /// Write entities to `<stem>_extracted_data.json`.
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            save_text: true,
            save_docx: true,
            save_json: true,
        }
    }
}

/// Upload server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,

    /// Directory for uploaded PDFs.
    pub upload_dir: PathBuf,

    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl BgxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
