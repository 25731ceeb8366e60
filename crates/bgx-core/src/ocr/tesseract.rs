//! OCR through the external `tesseract` executable.

use std::io::ErrorKind;
use std::process::{Command, Stdio};
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{ImagePreprocessor, OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs `tesseract <image> stdout -l <lang>` on a temporary PNG.
pub struct TesseractEngine {
    config: OcrConfig,
    preprocessor: ImagePreprocessor,
}

impl TesseractEngine {
    /// Create an engine from OCR configuration.
    pub fn new(config: OcrConfig) -> Self {
        let preprocessor = ImagePreprocessor::new()
            .with_grayscale(config.grayscale)
            .with_max_size(config.max_image_size);
        Self { config, preprocessor }
    }

    /// Whether the configured executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.tesseract_cmd)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        info!("Processing image: {}x{}", width, height);

        let prepared = self.preprocessor.prepare(image);

        let temp = tempfile::Builder::new()
            .prefix("bgx-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Preprocessing(format!("failed to create temp file: {}", e)))?;
        prepared
            .save_with_format(temp.path(), image::ImageFormat::Png)
            .map_err(|e| OcrError::Preprocessing(e.to_string()))?;

        let output = Command::new(&self.config.tesseract_cmd)
            .arg(temp.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::Unavailable(format!(
                    "'{}' not found on PATH",
                    self.config.tesseract_cmd
                )),
                _ => OcrError::Recognition(e.to_string()),
            })?;

        if !output.status.success() {
            return Err(OcrError::Recognition(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!("tesseract returned {} chars in {}ms", text.len(), processing_time_ms);

        Ok(OcrResult {
            boxes: Vec::new(),
            text,
            processing_time_ms,
            image_size: (width, height),
        })
    }
}
