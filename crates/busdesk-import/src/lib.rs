//! Local validation of bulk bus-import files.
//!
//! A file is checked completely before any upload: the whole file is
//! rejected on the first structural problem and only that problem is
//! reported.

pub mod error;
pub mod table;
pub mod validate;

pub use error::ImportError;
pub use table::{FileFormat, Table};
pub use validate::{
    parse_bus_file, validate_file_structure, validate_pending_file, BusRow, FileValidation,
    REQUIRED_COLUMNS,
};
