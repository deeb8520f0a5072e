//! Raw tabular content of CSV and Excel files.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::error::ImportError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xls,
    Xlsx,
}

impl FileFormat {
    /// Format from the file name's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnsupportedFormat`] for anything but
    /// `.csv`, `.xls` and `.xlsx`.
    pub fn from_file_name(file_name: &str) -> Result<Self, ImportError> {
        let ext = std::path::Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Header row plus data rows, each tagged with its 1-based line number in
/// the source (the header is usually row 1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub header_row: usize,
    pub rows: Vec<(usize, Vec<String>)>,
}

impl Table {
    /// Reads the first sheet (Excel) or the whole file (CSV).
    ///
    /// # Errors
    ///
    /// - [`ImportError::Csv`] on malformed CSV or invalid UTF-8.
    /// - [`ImportError::Spreadsheet`] if the workbook cannot be opened or has
    ///   no sheet.
    /// - [`ImportError::NoHeader`] if the file is empty.
    pub fn read(format: FileFormat, bytes: &[u8]) -> Result<Self, ImportError> {
        let table = match format {
            FileFormat::Csv => Self::read_csv(bytes)?,
            FileFormat::Xls | FileFormat::Xlsx => Self::read_workbook(bytes)?,
        };
        if table.headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::NoHeader);
        }
        Ok(table)
    }

    fn read_csv(bytes: &[u8]) -> Result<Self, ImportError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let header_row = reader
            .headers()?
            .position()
            .map_or(1, |p| usize::try_from(p.line()).unwrap_or(1));

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record
                .position()
                .map_or(header_row + rows.len() + 1, |p| {
                    usize::try_from(p.line()).unwrap_or(0)
                });
            rows.push((line, record.iter().map(str::to_string).collect()));
        }
        Ok(Self {
            headers,
            header_row,
            rows,
        })
    }

    fn read_workbook(bytes: &[u8]) -> Result<Self, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::Spreadsheet("the workbook has no sheets".to_string()))?
            .map_err(|e| ImportError::Spreadsheet(e.to_string()))?;

        let first_row = range
            .start()
            .map_or(0, |(row, _)| usize::try_from(row).unwrap_or(0));
        let mut lines = range.rows().enumerate().map(|(i, cells)| {
            let values: Vec<String> = cells
                .iter()
                .map(|c| c.to_string().trim().to_string())
                .collect();
            (first_row + i + 1, values)
        });

        let Some((header_row, headers)) = lines.next() else {
            return Err(ImportError::NoHeader);
        };
        Ok(Self {
            headers,
            header_row,
            rows: lines.collect(),
        })
    }

    /// Column index of `name`, matched trimmed and case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }
}
