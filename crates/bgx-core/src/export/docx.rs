//! Word document output.

use std::fs::File;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run};
use tracing::info;

use super::{Result, write_error};
use crate::error::ExportError;

/// Save one docx paragraph per entry.
pub fn save_docx(path: &Path, paragraphs: &[String]) -> Result<()> {
    let file = File::create(path).map_err(write_error(path))?;

    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    });

    docx.build()
        .pack(file)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    info!("Document saved to {}", path.display());
    Ok(())
}
