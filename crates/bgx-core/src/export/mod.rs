//! Writing extraction results: cleaned text, docx paragraphs, JSON fields and CSV summaries.

mod docx;

pub use docx::save_docx;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::ExportError;
use crate::models::guarantee::GuaranteeRecord;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Output files derived from one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<stem>.txt`
    pub text: PathBuf,
    /// `<stem>.docx`
    pub docx: PathBuf,
    /// `<stem>_extracted_data.json`
    pub json: PathBuf,
}

/// Output file names for `input`, placed in `output_dir`.
pub fn output_paths(output_dir: &Path, input: &Path) -> OutputPaths {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    OutputPaths {
        text: output_dir.join(format!("{}.txt", stem)),
        docx: output_dir.join(format!("{}.docx", stem)),
        json: output_dir.join(format!("{}_extracted_data.json", stem)),
    }
}

pub(crate) fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    }
}

/// Save text as UTF-8.
pub fn save_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(write_error(path))?;
    info!("Text saved to {}", path.display());
    Ok(())
}

/// Serialize as JSON with 4-space indentation.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Save the extracted fields as pretty JSON.
pub fn save_entities_json(path: &Path, record: &GuaranteeRecord) -> Result<()> {
    let json = to_json_pretty(record)?;
    fs::write(path, json).map_err(write_error(path))?;
    info!("Extracted data saved to {}", path.display());
    Ok(())
}

/// Summary CSV: a `File` column, then one column per field label.
pub fn records_to_csv<'a>(rows: impl IntoIterator<Item = (&'a str, &'a GuaranteeRecord)>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["File"];
    header.extend(GuaranteeRecord::LABELS);
    wtr.write_record(&header)?;

    for (file, record) in rows {
        let mut row = vec![file.to_string()];
        row.extend(record.entries().into_iter().map(|(_, value)| value));
        wtr.write_record(&row)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
