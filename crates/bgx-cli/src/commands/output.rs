//! Rendering processed documents for stdout.

use serde::Serialize;

use bgx_core::export::{records_to_csv, to_json_pretty};
use bgx_core::{GuaranteeRecord, ProcessedDocument, ResolvedCountries};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
    /// CSV output
    Csv,
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a str,
    entities: &'a GuaranteeRecord,
    #[serde(skip_serializing_if = "is_unresolved")]
    resolved_countries: &'a ResolvedCountries,
    #[serde(skip_serializing_if = "no_warnings")]
    warnings: &'a [String],
}

fn is_unresolved(countries: &&ResolvedCountries) -> bool {
    countries.beneficiary.is_none() && countries.applicant.is_none()
}

fn no_warnings(warnings: &&[String]) -> bool {
    warnings.is_empty()
}

pub fn format_document(name: &str, doc: &ProcessedDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(to_json_pretty(&Report {
            file: name,
            entities: &doc.record,
            resolved_countries: &doc.countries,
            warnings: &doc.warnings,
        })?),
        OutputFormat::Csv => Ok(records_to_csv([(name, &doc.record)])?),
        OutputFormat::Text => Ok(format_text(name, doc)),
    }
}

fn format_text(name: &str, doc: &ProcessedDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", name));
    for (label, value) in doc.record.entries() {
        out.push_str(&format!("{}: {}\n", label, value));
    }

    for (party, resolved) in [
        ("Beneficiary", &doc.countries.beneficiary),
        ("Applicant", &doc.countries.applicant),
    ] {
        if let Some(r) = resolved {
            out.push_str(&format!(
                "{} country (from address): {} [{:?}]\n",
                party, r.country, r.source
            ));
        }
    }

    if !doc.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &doc.warnings {
            out.push_str(&format!("  - {}\n", w));
        }
    }

    out
}
