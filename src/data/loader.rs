//! CSV Data Loader Module
//! Handles CSV file loading and column preparation using Polars.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

pub const STATE_COL: &str = "Estado";
pub const REGION_COL: &str = "Region";
pub const LEADS_COL: &str = "Leads_estimados";
pub const RAW_CONVERSION_COL: &str = "Conversion_%";
pub const CONVERSION_COL: &str = "Conversion_Rate";

const REQUIRED_COLUMNS: [&str; 4] = [STATE_COL, REGION_COL, LEADS_COL, CONVERSION_COL];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Conversion value {value:?} at row {row} is not numeric")]
    NonNumericConversion { row: usize, value: String },
    #[error("Leads value {value:?} at row {row} is not numeric")]
    NonNumericLeads { row: usize, value: String },
    #[error("No data loaded")]
    NoData,
}

/// Identifies a file on disk so unchanged files are not parsed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn of(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Handles CSV loading and keeps the last prepared DataFrame.
#[derive(Default)]
pub struct DataLoader {
    df: Option<DataFrame>,
    identity: Option<FileIdentity>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV file, reusing the cached frame when the file is unchanged.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let identity = FileIdentity::of(path.as_ref())?;
        if self.is_cached(&identity) {
            log::debug!("CSV cache hit for {}", identity.path.display());
        } else {
            let df = Self::read_csv_file(&identity.path)?;
            self.identity = Some(identity);
            self.df = Some(df);
        }
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Read and prepare a CSV file without touching any loader state.
    fn read_csv_file(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        log::info!(
            "Read {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Self::prepare_columns(df)
    }

    /// Parse and prepare CSV content already in memory.
    pub fn parse_csv_bytes(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Self::prepare_columns(df)
    }

    /// Rename the conversion column, check required columns and clean the
    /// conversion and leads text into numbers. Rows without a state are
    /// dropped; empty leads count as 0.
    pub fn prepare_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        if df.column(CONVERSION_COL).is_err() && df.column(RAW_CONVERSION_COL).is_ok() {
            df.rename(RAW_CONVERSION_COL, CONVERSION_COL.into())?;
        }

        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        let mut df = df
            .lazy()
            .filter(col(STATE_COL).is_not_null())
            .collect()?;

        let raw = df.column(CONVERSION_COL)?.cast(&DataType::String)?;
        let mut values: Vec<f64> = Vec::with_capacity(df.height());
        for (row, text) in raw.str()?.into_iter().enumerate() {
            let value = parse_percentage(text).ok_or_else(|| LoaderError::NonNumericConversion {
                row,
                value: text.unwrap_or_default().to_string(),
            })?;
            values.push(value);
        }
        df.with_column(Column::new(CONVERSION_COL.into(), values))?;

        let raw = df.column(LEADS_COL)?.cast(&DataType::String)?;
        let mut leads: Vec<f64> = Vec::with_capacity(df.height());
        for (row, text) in raw.str()?.into_iter().enumerate() {
            let value = match text {
                None => 0.0,
                Some(text) => {
                    parse_number(text).ok_or_else(|| LoaderError::NonNumericLeads {
                        row,
                        value: text.to_string(),
                    })?
                }
            };
            leads.push(value);
        }
        df.with_column(Column::new(LEADS_COL.into(), leads))?;

        Ok(df)
    }

    pub fn is_cached(&self, identity: &FileIdentity) -> bool {
        self.df.is_some() && self.identity.as_ref() == Some(identity)
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.identity.as_ref().map(|id| &id.path)
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}

/// Strip thousands separators and percent signs, then parse.
pub fn parse_percentage(text: Option<&str>) -> Option<f64> {
    let cleaned: String = text?.chars().filter(|c| *c != '%').collect();
    parse_number(&cleaned)
}

/// Parse a finite number, ignoring thousands separators.
/// `nan` and `inf` are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Region,Estado,Leads_estimados,Conversion_%
Centro,CDMX,12000,3.1%
Occidente,Jalisco,8000,12%
Sur,Oaxaca,1500,\"1,2\"
";

    #[test]
    fn parse_percentage_strips_formatting() {
        assert_eq!(parse_percentage(Some("3.5%")), Some(3.5));
        assert_eq!(parse_percentage(Some(" 12 % ")), Some(12.0));
        assert_eq!(parse_percentage(Some("1,250.5")), Some(1250.5));
        assert_eq!(parse_percentage(Some("n/a")), None);
        assert_eq!(parse_percentage(None), None);
    }

    #[test]
    fn nan_and_infinite_conversion_are_rejected() {
        assert_eq!(parse_percentage(Some("nan")), None);
        assert_eq!(parse_percentage(Some("inf%")), None);
        assert_eq!(parse_number("-infinity"), None);

        for value in ["nan", "inf%"] {
            let csv =
                format!("Region,Estado,Leads_estimados,Conversion_%\nSur,Chiapas,900,{value}\n");
            let err = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap_err();
            assert!(
                matches!(err, LoaderError::NonNumericConversion { row: 0, .. }),
                "{value} loaded: {err}"
            );
        }
    }

    #[test]
    fn formatted_leads_are_cleaned() {
        let csv = "\
Region,Estado,Leads_estimados,Conversion_%
Centro,CDMX,\"12,000\",3%
Sur,Oaxaca,1000,3%
Sur,Chiapas,,2%
";
        let df = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap();
        let column = df.column(LEADS_COL).unwrap();
        let leads: Vec<Option<f64>> = column.f64().unwrap().into_iter().collect();
        assert_eq!(leads, vec![Some(12_000.0), Some(1000.0), Some(0.0)]);
    }

    #[test]
    fn non_numeric_leads_fail_the_load() {
        let csv = "\
Region,Estado,Leads_estimados,Conversion_%
Sur,Oaxaca,1000,3%
Sur,Chiapas,mil,2%
";
        let err = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::NonNumericLeads { row, value } => {
                assert_eq!(row, 1);
                assert_eq!(value, "mil");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn renames_and_cleans_conversion_column() {
        let df = DataLoader::parse_csv_bytes(CSV.as_bytes()).unwrap();
        assert!(df.column(RAW_CONVERSION_COL).is_err());

        let conversion = df.column(CONVERSION_COL).unwrap();
        let values: Vec<Option<f64>> = conversion.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(3.1), Some(12.0), Some(12.0)]);
    }

    #[test]
    fn accepts_already_renamed_column() {
        let csv = "Region,Estado,Leads_estimados,Conversion_Rate\nSur,Chiapas,900,2.5\n";
        let df = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn non_numeric_conversion_fails_the_load() {
        let csv = "Region,Estado,Leads_estimados,Conversion_%\nSur,Chiapas,900,abc%\n";
        let err = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap_err();
        match err {
            LoaderError::NonNumericConversion { row, value } => {
                assert_eq!(row, 0);
                assert_eq!(value, "abc%");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "Region,Estado,Conversion_%\nSur,Chiapas,2.0\n";
        let err = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == LEADS_COL));
    }

    #[test]
    fn rows_without_state_are_dropped() {
        let csv = "Region,Estado,Leads_estimados,Conversion_%\nSur,,900,2.0\nSur,Chiapas,100,1.0\n";
        let df = DataLoader::parse_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(df.height(), 1);
    }
}
