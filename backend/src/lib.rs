//! # IFC Consolidate - merge disclosed project exports
//!
//! Consolidates the CSV exports downloaded from the IFC disclosure site
//! into one data set per project category. Investment projects are also
//! reshaped so each project appears on a single row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  CSV Files  │────▶│    Parser    │────▶│ Consolidate  │────▶│  UTF-8 CSV   │
//! │ (ISO-8859-1)│     │  (decode)    │     │ (union rows) │     │              │
//! └─────────────┘     └──────────────┘     └──────┬───────┘     └──────────────┘
//!                                                 │ Investment only
//!                                                 ▼
//!                                          ┌──────────────┐     ┌──────────────┐
//!                                          │  Uniquifier  │────▶│ ISO-8859-1   │
//!                                          │ (1 row / PID)│     │     CSV      │
//!                                          └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_consolidate::{run, ProjectCategory, RunConfig};
//!
//! let config = RunConfig::new(ProjectCategory::Investment);
//! let summary = run(&config).unwrap();
//! println!("Wrote {}", summary.consolidated.path.display());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Project category, column names, input encoding
//! - [`config`] - Layered run configuration
//! - [`table`] - In-memory text table
//! - [`parser`] - CSV reading and decoding
//! - [`export`] - CSV writing in UTF-8 or ISO-8859-1
//! - [`consolidate`] - Merge all files of a category
//! - [`transform`] - Uniquifier and pipeline
//! - [`logs`] - Console progress log

// Core modules
pub mod error;
pub mod models;
pub mod config;
pub mod table;

// I/O
pub mod parser;
pub mod export;

// Processing
pub mod consolidate;
pub mod transform;

// Console output
pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    ConfigError, ConsolidateError, ConsolidateResult, CsvError, CsvResult, SchemaError,
    SchemaResult,
};

pub use models::{ColumnNames, InputEncoding, ProjectCategory};

pub use config::{parse_date, RunConfig, DEFAULT_OUTPUT_DIR};

pub use table::{Cell, Table};

pub use parser::{decode_content, detect_encoding, parse_table, read_csv_file, ParseResult};

pub use export::{to_csv_bytes, write_csv_file, OutputEncoding};

pub use consolidate::{
    consolidate_dir, consolidate_tables, consolidated_file_name, list_csv_files, read_tables,
};

pub use transform::{
    normalize_doc_type, run, unique_file_name, OutputInfo, RunSummary, Uniquified, Uniquifier,
};
