//! Transformation module.
//!
//! - Uniquifier: one row per project, text columns per document type
//! - Pipeline: consolidate, uniquify, export

pub mod pipeline;
pub mod uniquifier;

pub use pipeline::{run, OutputInfo, RunSummary};
pub use uniquifier::{normalize_doc_type, unique_file_name, TextRange, Uniquified, Uniquifier};
