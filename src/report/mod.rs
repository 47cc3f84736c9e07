//! Report emission: abundance CSVs, the retained-reference list, and the
//! optional per-reference evidence artifact.

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::core::{AbundanceTable, MappingEvidence, ReferenceId};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write an abundance table as two-column CSV records
/// (`reference name, predicted abundance`).
///
/// # Errors
///
/// Returns `ReportError::Io` on write failure.
pub fn write_abundance_csv(path: &Path, table: &AbundanceTable) -> Result<(), ReportError> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "genome name,predicted abundance")?;
    for (label, fraction) in table.fractions() {
        writeln!(file, "{label},{fraction}")?;
    }
    Ok(())
}

/// Write a line-separated reference name list (`.lsv`).
///
/// # Errors
///
/// Returns `ReportError::Io` on write failure.
pub fn write_name_list(path: &Path, names: &[ReferenceId]) -> Result<(), ReportError> {
    let mut file = std::fs::File::create(path)?;
    for name in names {
        writeln!(file, "{name}")?;
    }
    Ok(())
}

/// Dump per-reference mapping evidence as JSON:
/// `{reference: {qualities, intervals, hit_count}}`.
///
/// A convenience artifact for offline plotting, not required for
/// correctness.
///
/// # Errors
///
/// Returns `ReportError::Io` on write failure or `ReportError::Json` if
/// serialization fails.
pub fn write_evidence_json(
    path: &Path,
    evidence: &[(ReferenceId, MappingEvidence)],
) -> Result<(), ReportError> {
    let map: serde_json::Map<String, serde_json::Value> = evidence
        .iter()
        .map(|(id, ev)| Ok((id.to_string(), serde_json::to_value(ev)?)))
        .collect::<Result<_, serde_json::Error>>()?;
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &serde_json::Value::Object(map))?;
    Ok(())
}
