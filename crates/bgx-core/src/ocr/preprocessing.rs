//! Image preprocessing for OCR.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

/// Image preprocessor applied before recognition.
pub struct ImagePreprocessor {
    /// Maximum image dimension, 0 = unlimited.
    max_size: u32,
    /// Convert to 8-bit grayscale.
    grayscale: bool,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self {
            max_size: 0,
            grayscale: true,
        }
    }

    /// Set maximum image dimension.
    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = size;
        self
    }

    /// Enable or disable grayscale conversion.
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Apply the configured steps.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let longest = width.max(height);

        let resized = if self.max_size > 0 && longest > self.max_size {
            let (w, h) = scaled_dimensions(width, height, self.max_size);
            debug!("Resizing {}x{} -> {}x{}", width, height, w, h);
            image.resize_exact(w, h, image::imageops::FilterType::Lanczos3)
        } else {
            image.clone()
        };

        if self.grayscale {
            DynamicImage::ImageLuma8(resized.to_luma8())
        } else {
            resized
        }
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Fit `(width, height)` inside `max` keeping the aspect ratio.
fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = max as f32 / width.max(height) as f32;
    let w = ((width as f32 * scale).round() as u32).max(1);
    let h = ((height as f32 * scale).round() as u32).max(1);
    (w, h)
}
