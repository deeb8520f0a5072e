//! Structural checks for bus import files.

use busdesk_core::PendingFile;
use serde::Serialize;

use crate::error::ImportError;
use crate::table::{FileFormat, Table};

/// Columns every import file must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "plateNumber",
    "busType",
    "capacity",
    "seatLayout",
    "baseStationId",
    "amenities",
];

/// One validated bus line of an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusRow {
    /// Spreadsheet row number (the header is row 1).
    #[serde(skip)]
    pub row: usize,
    pub plate_number: String,
    pub bus_type: String,
    pub capacity: u32,
    pub seat_layout: String,
    pub base_station_id: String,
    pub amenities: Vec<String>,
}

/// Outcome of [`validate_file_structure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileValidation {
    pub is_valid: bool,
    pub error: Option<String>,
    pub rows: Vec<BusRow>,
}

impl FileValidation {
    fn accepted(rows: Vec<BusRow>) -> Self {
        Self {
            is_valid: true,
            error: None,
            rows,
        }
    }

    fn rejected(err: &ImportError) -> Self {
        Self {
            is_valid: false,
            error: Some(err.to_string()),
            rows: Vec::new(),
        }
    }
}

/// Validate an import file without touching the network.
///
/// Never fails: problems are reported through `is_valid`/`error`.
#[must_use]
pub fn validate_file_structure(file_name: &str, bytes: &[u8]) -> FileValidation {
    match parse_bus_file(file_name, bytes) {
        Ok(rows) => {
            tracing::debug!(file = file_name, rows = rows.len(), "import file accepted");
            FileValidation::accepted(rows)
        }
        Err(err) => {
            tracing::debug!(file = file_name, error = %err, "import file rejected");
            FileValidation::rejected(&err)
        }
    }
}

#[must_use]
pub fn validate_pending_file(file: &PendingFile) -> FileValidation {
    validate_file_structure(&file.file_name, &file.bytes)
}

/// Parse and validate every row of an import file.
///
/// # Errors
///
/// The first problem found, in this order: unsupported extension, unreadable
/// content, missing header columns, the first invalid row, no rows at all.
pub fn parse_bus_file(file_name: &str, bytes: &[u8]) -> Result<Vec<BusRow>, ImportError> {
    let format = FileFormat::from_file_name(file_name)?;
    let table = Table::read(format, bytes)?;

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| table.column(name).is_none())
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }
    let columns: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|name| table.column(name))
        .collect();

    let mut rows = Vec::new();
    for (line, cells) in &table.rows {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(parse_row(*line, cells, &columns)?);
    }
    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }
    Ok(rows)
}

fn parse_row(line: usize, cells: &[String], columns: &[usize]) -> Result<BusRow, ImportError> {
    let mut values = Vec::with_capacity(columns.len());
    for (name, &index) in REQUIRED_COLUMNS.iter().zip(columns) {
        let value = cells.get(index).map_or("", |c| c.trim());
        if value.is_empty() {
            return Err(ImportError::InvalidRow {
                row: line,
                reason: format!("missing value for {name}"),
            });
        }
        values.push(value.to_string());
    }

    let capacity = parse_capacity(&values[2]).ok_or_else(|| ImportError::InvalidRow {
        row: line,
        reason: format!(
            "capacity must be a positive whole number (got \"{}\")",
            values[2]
        ),
    })?;

    let amenities = values[5]
        .split([',', ';'])
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();

    Ok(BusRow {
        row: line,
        plate_number: values[0].clone(),
        bus_type: values[1].clone(),
        capacity,
        seat_layout: values[3].clone(),
        base_station_id: values[4].clone(),
        amenities,
    })
}

/// Positive whole number; spreadsheets may hand back `70` as `70.0`.
fn parse_capacity(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return (n > 0).then_some(n);
    }
    let float = raw.parse::<f64>().ok()?;
    if float.fract() != 0.0 || float < 1.0 || float > f64::from(u32::MAX) {
        return None;
    }
    format!("{float:.0}").parse().ok()
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
