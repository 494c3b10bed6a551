use crate::analysis::{AnalysisTable, ANALYSIS_COLUMNS};
use crate::error::{PipelineError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(PipelineError::Config(format!("unknown output format '{other}'"))),
        }
    }
}

/// Write the rows as CSV; nulls become empty cells. The header is written
/// even when there are no rows.
pub fn write_csv<W: Write>(table: &AnalysisTable, w: W) -> Result<()> {
    let mut wrt = csv::Writer::from_writer(w);
    if table.is_empty() {
        wrt.write_record(ANALYSIS_COLUMNS)?;
    }
    for row in table.iter() {
        wrt.serialize(row)?;
    }
    wrt.flush()?;
    Ok(())
}

/// Write the rows as a pretty JSON array
pub fn write_json<W: Write>(table: &AnalysisTable, w: W) -> Result<()> {
    serde_json::to_writer_pretty(w, &table.rows)?;
    Ok(())
}

pub fn write<W: Write>(table: &AnalysisTable, format: OutputFormat, w: W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, w),
        OutputFormat::Json => write_json(table, w),
    }
}

/// Persist the table to a file, creating parent directories
pub fn persist(table: &AnalysisTable, format: OutputFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = std::io::BufWriter::new(fs::File::create(path)?);
    write(table, format, &mut out)?;
    out.flush()?;
    info!("💾 Saved {} rows to {}", table.len(), path.display());
    Ok(())
}
