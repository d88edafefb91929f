//! CSV Export
//! Writes result frames to CSV with Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CsvExporter;

impl CsvExporter {
    /// Serialize a frame to UTF-8 CSV with a header row.
    pub fn to_csv_bytes(df: &mut DataFrame) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(df)?;
        Ok(buffer)
    }

    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
        let bytes = Self::to_csv_bytes(df)?;
        std::fs::write(path, bytes)?;
        log::info!("Exported {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
