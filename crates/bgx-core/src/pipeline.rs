//! Document pipeline: PDF bytes to text, cleaned text and guarantee fields.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::country::{Gazetteer, resolve_countries};
use crate::error::{BgxError, ExtractionError};
use crate::guarantee::{GuaranteeParser, RuleBasedParser};
use crate::models::config::BgxConfig;
use crate::models::guarantee::{GuaranteeRecord, ResolvedCountries};
use crate::ocr::{OcrEngine, create_engine};
use crate::pdf::{PdfContent, PdfExtractor, PdfPage, PdfProcessor, PdfType, visible_chars};
use crate::text::{clean_text, split_into_paragraphs};
use crate::Result;

/// Where the document text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded PDF text layer.
    TextLayer,
    /// OCR of page images.
    Ocr,
    /// Some pages by OCR, others from the text layer.
    Mixed,
}

/// Raw text of a document and how it was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSource {
    pub text: String,
    pub method: ExtractionMethod,
    pub pdf_type: PdfType,
    pub page_count: u32,
    pub warnings: Vec<String>,
}

/// Everything produced for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// Text as extracted.
    pub raw_text: String,
    /// Text after `clean_text`.
    pub cleaned_text: String,
    /// Cleaned text grouped into paragraphs.
    pub paragraphs: Vec<String>,
    /// Extracted fields.
    pub record: GuaranteeRecord,
    /// Countries resolved from addresses.
    pub countries: ResolvedCountries,
    /// Text source, absent when processing plain text.
    pub source: Option<TextSource>,
    /// Warnings from extraction and parsing.
    pub warnings: Vec<String>,
}

/// Runs extraction steps according to a [`BgxConfig`].
pub struct DocumentPipeline {
    config: BgxConfig,
    engine: Option<Box<dyn OcrEngine>>,
    gazetteer: Gazetteer,
}

impl DocumentPipeline {
    /// Create a pipeline; the OCR engine is built from config when first needed.
    pub fn new(config: BgxConfig) -> Self {
        Self {
            engine: None,
            gazetteer: Gazetteer::from_config(&config.extraction),
            config,
        }
    }

    /// Use this OCR engine instead of the configured one.
    pub fn with_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn config(&self) -> &BgxConfig {
        &self.config
    }

    fn wants_ocr(&self, content: &PdfContent) -> bool {
        match content.pdf_type {
            PdfType::Image => true,
            _ if self.config.extraction.use_ocr => true,
            PdfType::Hybrid => {
                !self.config.pdf.prefer_embedded_text
                    || visible_chars(&content.text) < self.config.pdf.min_text_length
            }
            PdfType::Text | PdfType::Empty => false,
        }
    }

    /// Extract the text of a PDF, running OCR where the configuration asks for it.
    pub fn extract_text(&self, data: &[u8]) -> Result<TextSource> {
        let mut extractor = PdfExtractor::new().with_min_text_length(self.config.pdf.min_text_length);
        extractor.load(data)?;

        let content = extractor.extract_all()?;
        let page_count = content.pages.len() as u32;
        let limit = match self.config.pdf.max_pages {
            0 => content.pages.len(),
            n => n.min(content.pages.len()),
        };
        let pages = &content.pages[..limit];
        let mut warnings = Vec::new();

        if limit < content.pages.len() {
            warnings.push(format!("Only the first {} of {} pages were processed", limit, page_count));
        }

        info!("PDF type {:?}, {} pages", content.pdf_type, page_count);

        if !self.wants_ocr(&content) {
            return Ok(TextSource {
                text: join_pages(pages.iter().map(|p| p.text.as_str())),
                method: ExtractionMethod::TextLayer,
                pdf_type: content.pdf_type,
                page_count,
                warnings,
            });
        }

        let created;
        let engine: &dyn OcrEngine = match &self.engine {
            Some(engine) => engine.as_ref(),
            None => match create_engine(&self.config.ocr) {
                Ok(engine) => {
                    created = engine;
                    created.as_ref()
                }
                Err(e) => {
                    warn!("OCR unavailable, using text layer: {}", e);
                    warnings.push(format!("OCR unavailable, used text layer: {}", e));
                    return Ok(TextSource {
                        text: join_pages(pages.iter().map(|p| p.text.as_str())),
                        method: ExtractionMethod::TextLayer,
                        pdf_type: content.pdf_type,
                        page_count,
                        warnings,
                    });
                }
            },
        };

        let mut texts = Vec::with_capacity(pages.len());
        let mut ocr_pages = 0;

        for page in pages {
            match self.ocr_page(&extractor, engine, page) {
                Ok(text) => {
                    ocr_pages += 1;
                    texts.push(text);
                }
                Err(reason) => {
                    warn!("Page {}: {}, using text layer", page.number, reason);
                    warnings.push(format!("Page {}: {}, used text layer", page.number, reason));
                    texts.push(page.text.clone());
                }
            }
        }

        let method = match ocr_pages {
            0 => ExtractionMethod::TextLayer,
            n if n == pages.len() => ExtractionMethod::Ocr,
            _ => ExtractionMethod::Mixed,
        };
        debug!("OCR'd {} of {} pages with {}", ocr_pages, pages.len(), engine.name());

        Ok(TextSource {
            text: join_pages(texts.iter().map(String::as_str)),
            method,
            pdf_type: content.pdf_type,
            page_count,
            warnings,
        })
    }

    fn ocr_page(
        &self,
        extractor: &PdfExtractor,
        engine: &dyn OcrEngine,
        page: &PdfPage,
    ) -> std::result::Result<String, String> {
        if page.image_count == 0 {
            return Err("no page image".to_string());
        }
        let image = extractor.render_page(page.number).map_err(|e| e.to_string())?;
        let result = engine.recognize(&image).map_err(|e| e.to_string())?;
        debug!("Page {}: {} chars in {}ms", page.number, result.text.len(), result.processing_time_ms);
        Ok(result.text)
    }

    /// Run the full pipeline on PDF bytes.
    pub fn process(&self, data: &[u8]) -> Result<ProcessedDocument> {
        let source = self.extract_text(data)?;
        let raw_text = source.text.clone();
        self.finish(raw_text, Some(source))
    }

    /// Run cleaning and extraction on already extracted text.
    pub fn process_text(&self, text: &str) -> Result<ProcessedDocument> {
        self.finish(text.to_string(), None)
    }

    /// Read a PDF from disk and process it.
    pub fn process_file(&self, path: &Path) -> Result<ProcessedDocument> {
        let data = std::fs::read(path)?;
        info!("Processing {}", path.display());
        self.process(&data)
    }

    fn finish(&self, raw_text: String, source: Option<TextSource>) -> Result<ProcessedDocument> {
        let start = Instant::now();

        if raw_text.trim().is_empty() {
            return Err(BgxError::Extraction(ExtractionError::NoText));
        }

        let cleaned_text = clean_text(&raw_text);
        let paragraphs = split_into_paragraphs(&cleaned_text);

        let parsed = RuleBasedParser::new().with_cleaning(false).parse(&cleaned_text)?;
        let record = parsed.record;

        let countries = if self.config.extraction.resolve_countries {
            resolve_countries(&record, &self.gazetteer)
        } else {
            ResolvedCountries::default()
        };

        let mut warnings = source.as_ref().map(|s| s.warnings.clone()).unwrap_or_default();
        warnings.extend(parsed.warnings);

        debug!(
            "Processed {} paragraphs in {}ms",
            paragraphs.len(),
            start.elapsed().as_millis()
        );

        Ok(ProcessedDocument {
            raw_text,
            cleaned_text,
            paragraphs,
            record,
            countries,
            source,
            warnings,
        })
    }
}

fn join_pages<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts
        .map(str::trim_end)
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::models::guarantee::CountrySource;
    use crate::ocr::OcrResult;
    use crate::pdf::build_pdf;
    use image::DynamicImage;
    use pretty_assertions::assert_eq;

    struct FixedEngine(&'static str);

    impl OcrEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, image: &DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            Ok(OcrResult {
                boxes: Vec::new(),
                text: self.0.to_string(),
                processing_time_ms: 0,
                image_size: (image.width(), image.height()),
            })
        }
    }

    struct FailingEngine;

    impl OcrEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            Err(OcrError::Recognition("model crashed".to_string()))
        }
    }

    const LONG_TEXT: &str =
        "BG No.1234/2024 issued in favour of Oil India Limited, valid till 31/03/2025";

    fn text_layer_config() -> BgxConfig {
        let mut config = BgxConfig::default();
        config.extraction.use_ocr = false;
        config
    }

    #[test]
    fn test_text_pdf_uses_text_layer() {
        let pipeline = DocumentPipeline::new(text_layer_config()).with_engine(Box::new(FixedEngine("ocr")));
        let source = pipeline.extract_text(&build_pdf(LONG_TEXT, None)).unwrap();

        assert_eq!(source.method, ExtractionMethod::TextLayer);
        assert_eq!(source.pdf_type, PdfType::Text);
        assert_eq!(source.page_count, 1);
        assert!(source.text.contains("Oil India Limited"), "got {:?}", source.text);
    }

    #[test]
    fn test_image_pdf_goes_to_ocr() {
        let pipeline = DocumentPipeline::new(text_layer_config())
            .with_engine(Box::new(FixedEngine("BG No . 55/2024")));
        let source = pipeline.extract_text(&build_pdf("scan", Some((4, 3)))).unwrap();

        assert_eq!(source.pdf_type, PdfType::Image);
        assert_eq!(source.method, ExtractionMethod::Ocr);
        assert_eq!(source.text, "BG No . 55/2024");
        assert!(source.warnings.is_empty());
    }

    #[test]
    fn test_forced_ocr_falls_back_per_page() {
        let pipeline = DocumentPipeline::new(BgxConfig::default()).with_engine(Box::new(FixedEngine("ocr")));
        let source = pipeline.extract_text(&build_pdf(LONG_TEXT, None)).unwrap();

        assert_eq!(source.method, ExtractionMethod::TextLayer);
        assert_eq!(source.warnings.len(), 1);
        assert!(source.warnings[0].contains("Page 1"));
        assert!(source.text.contains("Oil India Limited"));
    }

    #[test]
    fn test_recognition_failure_falls_back() {
        let pipeline = DocumentPipeline::new(text_layer_config()).with_engine(Box::new(FailingEngine));
        let source = pipeline.extract_text(&build_pdf("scan", Some((4, 3)))).unwrap();

        assert_eq!(source.method, ExtractionMethod::TextLayer);
        assert!(source.warnings[0].contains("model crashed"));
    }

    #[test]
    fn test_garbage_is_a_pdf_error() {
        let pipeline = DocumentPipeline::new(text_layer_config());
        assert!(matches!(pipeline.extract_text(b"nope"), Err(BgxError::Pdf(_))));
    }

    #[test]
    fn test_process_pdf_end_to_end() {
        let pipeline = DocumentPipeline::new(text_layer_config());
        let doc = pipeline.process(&build_pdf(LONG_TEXT, None)).unwrap();

        assert_eq!(doc.record.bg_numbers, Some(vec!["1234/2024".to_string()]));
        assert_eq!(doc.record.beneficiary_name.as_deref(), Some("Oil India Limited"));
        assert!(doc.source.is_some());
        assert!(!doc.paragraphs.is_empty());
    }

    #[test]
    fn test_process_text_resolves_countries() {
        let pipeline = DocumentPipeline::new(BgxConfig::default());
        let doc = pipeline
            .process_text(
                "In favour of Oil India Limited. M/s. Grant Infra Projects Pvt Ltd, having its \
                 registered office at Grant House, Uppal Hyderabad 500013. Beneficiary Country: India.",
            )
            .unwrap();

        assert!(doc.countries.beneficiary.is_none());
        let applicant = doc.countries.applicant.unwrap();
        assert_eq!(applicant.country, "India");
        assert_eq!(applicant.source, CountrySource::City);
        assert!(doc.source.is_none());
        assert!(doc.warnings.iter().any(|w| w.contains("BG number")));
    }

    #[test]
    fn test_country_resolution_can_be_disabled() {
        let mut config = BgxConfig::default();
        config.extraction.resolve_countries = false;
        let doc = DocumentPipeline::new(config)
            .process_text("M/s. Acme Ltd, office at 12 MG Road, Bangalore. done")
            .unwrap();
        assert_eq!(doc.countries, ResolvedCountries::default());
    }

    #[test]
    fn test_empty_text_is_no_text() {
        let err = DocumentPipeline::new(BgxConfig::default()).process_text("  \n").unwrap_err();
        assert!(matches!(err, BgxError::Extraction(ExtractionError::NoText)));
    }
}
