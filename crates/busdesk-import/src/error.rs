use thiserror::Error;

/// Why an import file was rejected. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type '{0}': only .csv, .xls and .xlsx files are accepted")]
    UnsupportedFormat(String),

    #[error("Could not read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("The file has no header row")]
    NoHeader,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("The file contains no bus rows")]
    NoRows,
}
