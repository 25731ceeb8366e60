//! Process command - extract fields from a single guarantee PDF.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

use bgx_core::country::{OpenCageGeocoder, resolve_countries_online};
use bgx_core::error::ExtractionError;
use bgx_core::export::{output_paths, save_docx, save_entities_json, save_text};
use bgx_core::models::config::BgxConfig;
use bgx_core::{BgxError, DocumentPipeline, ProcessedDocument};

use super::load_config;
use super::output::{OutputFormat, format_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Directory for the .txt, .docx and .json outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for stdout
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR page images even when a text layer exists
    #[arg(long, conflicts_with = "no_ocr")]
    ocr: bool,

    /// Read the text layer only, unless the PDF is a scan
    #[arg(long)]
    no_ocr: bool,

    /// Do not write output files
    #[arg(long)]
    no_save: bool,

    /// Ask the geocoding service for countries not found offline
    #[arg(long)]
    geocode: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.ocr {
        config.extraction.use_ocr = true;
    }
    if args.no_ocr {
        config.extraction.use_ocr = false;
    }
    if args.geocode {
        config.extraction.geocode = true;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {} (expected a PDF)", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(if config.extraction.use_ocr { "Running OCR..." } else { "Extracting text..." });
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let pipeline = DocumentPipeline::new(config.clone());
    let result = pipeline.process_file(&args.input);
    pb.finish_and_clear();

    let mut doc = match result {
        Ok(doc) => doc,
        Err(BgxError::Extraction(ExtractionError::NoText)) => {
            warn!("No text extracted from the PDF.");
            anyhow::bail!("No text extracted from {}", args.input.display());
        }
        Err(e) => return Err(e.into()),
    };

    if config.extraction.geocode {
        geocode_countries(&config, &mut doc).await;
    }

    log_document(&doc);

    if !args.no_save {
        let output_dir = args.output_dir.clone().unwrap_or_else(|| config.output.output_dir.clone());
        save_outputs(&config, &output_dir, &args.input, &doc);
    }

    let name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    println!("{}", format_document(name, &doc, args.format)?);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Log each paragraph and entity.
pub(crate) fn log_document(doc: &ProcessedDocument) {
    for warning in &doc.warnings {
        warn!("{}", warning);
    }
    for (i, paragraph) in doc.paragraphs.iter().enumerate() {
        info!("Paragraph {}: {}", i + 1, paragraph);
    }
    for (label, value) in doc.record.entries() {
        info!("{}: {}", label, value);
    }
}

/// Write the configured output files. Failures are logged and skipped.
pub(crate) fn save_outputs(config: &BgxConfig, output_dir: &Path, input: &Path, doc: &ProcessedDocument) {
    if let Err(e) = std::fs::create_dir_all(output_dir) {
        error!("Cannot create {}: {}", output_dir.display(), e);
        return;
    }

    let paths = output_paths(output_dir, input);

    if config.output.save_text {
        match save_text(&paths.text, &doc.cleaned_text) {
            Ok(()) => eprintln!("{} Text saved to {}", style("✓").green(), paths.text.display()),
            Err(e) => error!("{}", e),
        }
    }
    if config.output.save_docx {
        match save_docx(&paths.docx, &doc.paragraphs) {
            Ok(()) => eprintln!("{} Document saved to {}", style("✓").green(), paths.docx.display()),
            Err(e) => error!("{}", e),
        }
    }
    if config.output.save_json {
        match save_entities_json(&paths.json, &doc.record) {
            Ok(()) => eprintln!("{} Extracted data saved to {}", style("✓").green(), paths.json.display()),
            Err(e) => error!("{}", e),
        }
    }
}

async fn geocode_countries(config: &BgxConfig, doc: &mut ProcessedDocument) {
    let geocoder = match OpenCageGeocoder::new(&config.geocoding) {
        Ok(g) => g,
        Err(e) => {
            warn!("Geocoding disabled: {}", e);
            return;
        }
    };

    if let Err(e) = resolve_countries_online(&doc.record, &mut doc.countries, &geocoder).await {
        warn!("Geocoding failed: {}", e);
    }
}
