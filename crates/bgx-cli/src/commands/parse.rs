//! Parse command - run the field rules over plain text.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use bgx_core::DocumentPipeline;

use super::load_config;
use super::output::{OutputFormat, format_document};

#[derive(Args)]
pub struct ParseArgs {
    /// Text file to parse, or "-" for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let (name, text) = if args.input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        ("stdin".to_string(), text)
    } else {
        let name = args
            .input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("input")
            .to_string();
        (name, std::fs::read_to_string(&args.input)?)
    };

    info!("Parsing {} ({} bytes)", name, text.len());

    let doc = DocumentPipeline::new(config).process_text(&text)?;
    println!("{}", format_document(&name, &doc, args.format)?);

    Ok(())
}
