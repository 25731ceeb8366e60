//! OCR engines for scanned guarantee pages.

mod preprocessing;
#[cfg(feature = "tesseract")]
mod tesseract;
#[cfg(feature = "paddle")]
mod paddle;

pub use preprocessing::ImagePreprocessor;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractEngine;
#[cfg(feature = "paddle")]
pub use paddle::PaddleEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::{OcrConfig, OcrEngineKind};

/// A recognized text region with its coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Quadrilateral corners (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR on one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Text regions, empty for engines that only return plain text.
    pub boxes: Vec<TextBox>,

    /// Full recognized text.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Sort boxes by reading order and rebuild the text from them.
    pub fn sort_by_reading_order(&mut self) {
        sort_reading_order(&mut self.boxes);
        self.text = self
            .boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

/// Top-to-bottom in 20px rows, then left-to-right.
pub(crate) fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();
        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

/// An OCR engine that turns a page image into text.
pub trait OcrEngine {
    /// Short engine name for logs and metadata.
    fn name(&self) -> &str;

    /// Recognize text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// Build the engine selected in the configuration.
pub fn create_engine(config: &OcrConfig) -> Result<Box<dyn OcrEngine>, OcrError> {
    match config.engine {
        #[cfg(feature = "tesseract")]
        OcrEngineKind::Tesseract => {
            let engine = TesseractEngine::new(config.clone());
            if !engine.is_available() {
                return Err(OcrError::Unavailable(format!(
                    "'{}' not found on PATH",
                    config.tesseract_cmd
                )));
            }
            Ok(Box::new(engine))
        }
        #[cfg(feature = "paddle")]
        OcrEngineKind::Paddle => Ok(Box::new(PaddleEngine::from_dir(
            &config.model_dir,
            config.clone(),
        )?)),
        #[allow(unreachable_patterns)]
        other => Err(OcrError::Unavailable(format!(
            "{:?} engine not compiled in",
            other
        ))),
    }
}
