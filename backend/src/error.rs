//! Error types for the consolidation pipeline.
//!
//! One enum per layer:
//!
//! - [`CsvError`] - reading and writing CSV files
//! - [`SchemaError`] - expected columns missing or misplaced
//! - [`ConfigError`] - invalid configuration values
//! - [`ConsolidateError`] - top-level run errors
//!
//! Conversion into [`ConsolidateError`] is automatic via `From`,
//! so `?` works across layer boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading or writing CSV files.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read or write a file.
    #[error("Cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("Invalid CSV in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A value has no representation in the legacy output encoding.
    #[error("Line {line}, column '{column}': value cannot be encoded as ISO-8859-1 (windows-1252)")]
    Unencodable { line: usize, column: String },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors raised when a table does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A required column is absent.
    #[error("Column '{column}' not found ({context})")]
    MissingColumn { column: String, context: String },

    /// The text range end marker precedes the start marker.
    #[error("Text range is inverted: '{end}' comes before '{start}'")]
    InvertedTextRange { start: String, end: String },

    /// A key column sits between the text range markers.
    #[error("Column '{column}' lies inside the text range")]
    ColumnInsideTextRange { column: String },
}

impl SchemaError {
    pub fn missing(column: impl Into<String>, context: impl Into<String>) -> Self {
        SchemaError::MissingColumn {
            column: column.into(),
            context: context.into(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors in user supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Date is not `YYYY-MM-DD`.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Unknown input encoding name.
    #[error("Unknown input encoding '{0}', expected 'latin1' or 'auto'")]
    UnknownEncoding(String),
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Errors that terminate a consolidation run.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// Bad project type argument.
    #[error("Invalid project type '{0}': please type the choice between IS and AS")]
    InvalidArgument(String),

    /// The `<category>_Services` input folder does not exist.
    #[error("Input directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem error outside CSV handling.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Summary serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for schema checks.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for whole runs.
pub type ConsolidateResult<T> = Result<T, ConsolidateError>;
