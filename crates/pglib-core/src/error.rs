//! Error taxonomy for case-file loading.
//!
//! Every stage of the pipeline (extraction, normalization, type inference,
//! graph projection) reports failures through [`CaseError`]. Errors are
//! surfaced to the caller unchanged; nothing in the pipeline retries.
//!
//! # Example
//!
//! ```ignore
//! use pglib_core::{CaseError, CaseResult};
//!
//! fn require_rows(count: usize) -> CaseResult<()> {
//!     if count == 0 {
//!         return Err(CaseError::malformed_header("bus data", "table has no header row"));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for case-file operations.
#[derive(Error, Debug)]
pub enum CaseError {
    /// One of the required named tables was not present in the case file.
    #[error("missing table: '{name}' not found in case file")]
    MissingTable { name: String },

    /// Row counts or row widths do not line up with the table's header.
    #[error("misaligned table '{table}': {detail}")]
    MisalignedTable { table: String, detail: String },

    /// A header row is absent, too short, or the coefficient count is unusable.
    #[error("malformed header in '{table}': {detail}")]
    MalformedHeader { table: String, detail: String },

    /// A column could not be typed or re-read from its text form.
    #[error("type inference failed for column '{column}': {detail}")]
    TypeInference { column: String, detail: String },

    /// A column the graph view depends on is missing from a dataset.
    #[error("missing column '{column}' in {table} dataset")]
    MissingColumn { table: String, column: String },

    /// A bus identifier is not an integer.
    #[error("invalid bus identifier '{value}' in {table} row {row}")]
    InvalidBusId {
        table: String,
        row: usize,
        value: String,
    },

    /// A branch's `line_idx` key is not a non-negative integer.
    #[error("invalid line_idx '{value}' in branch row {row}")]
    InvalidLineIdx { row: usize, value: String },

    /// A branch endpoint names a bus that is not in the bus dataset.
    #[error("branch {line_idx} references unknown bus {bus}")]
    UnknownBus { line_idx: usize, bus: i64 },

    /// The case file could not be read.
    #[error("I/O error reading '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Load options could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using CaseError.
pub type CaseResult<T> = Result<T, CaseError>;

impl CaseError {
    pub fn missing_table(name: impl Into<String>) -> Self {
        CaseError::MissingTable { name: name.into() }
    }

    pub fn misaligned(table: impl Into<String>, detail: impl Into<String>) -> Self {
        CaseError::MisalignedTable {
            table: table.into(),
            detail: detail.into(),
        }
    }

    pub fn malformed_header(table: impl Into<String>, detail: impl Into<String>) -> Self {
        CaseError::MalformedHeader {
            table: table.into(),
            detail: detail.into(),
        }
    }

    pub fn type_inference(column: impl Into<String>, detail: impl Into<String>) -> Self {
        CaseError::TypeInference {
            column: column.into(),
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CaseError::Io {
            path: path.into(),
            source,
        }
    }
}
