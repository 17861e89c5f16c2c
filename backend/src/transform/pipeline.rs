//! High-level run: consolidate a category, then uniquify Investment data.
//!
//! # Example
//!
//! ```rust,ignore
//! use ifc_consolidate::{run, ProjectCategory, RunConfig};
//!
//! let config = RunConfig::new(ProjectCategory::Investment).with_env()?;
//! let summary = run(&config)?;
//! println!("{} rows consolidated", summary.consolidated.rows);
//! ```

use serde::Serialize;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::consolidate::{consolidate_dir, consolidated_file_name};
use crate::error::ConsolidateResult;
use crate::export::{write_csv_file, OutputEncoding};
use crate::logs::{log_info, log_success, log_warning, LogEntry, LOG_SINK};
use crate::table::Table;
use crate::transform::uniquifier::{unique_file_name, Uniquified, Uniquifier};

/// Description of one output table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputInfo {
    /// Where the file was (or would have been) written
    pub path: PathBuf,
    /// Encoding of the file
    pub encoding: OutputEncoding,
    pub rows: usize,
    pub columns: usize,
    /// Whether the file was actually written
    pub written: bool,
}

/// Result of a complete run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Configuration used
    pub config: RunConfig,
    /// Consolidated table
    pub consolidated: OutputInfo,
    /// Unique table (Investment only)
    pub unique: Option<OutputInfo>,
    /// Document types found while uniquifying
    pub doc_types: Vec<String>,
    /// Progress log of the run
    pub log: Vec<LogEntry>,
}

/// Run both phases for the configured category.
///
/// 1. Consolidate every CSV file of `<category>_Services`
/// 2. Write the consolidated table as UTF-8
/// 3. For Investment, collapse to one row per project
/// 4. Write the unique table as ISO-8859-1
pub fn run(config: &RunConfig) -> ConsolidateResult<RunSummary> {
    log_info(format!(
        "IFC {} Services ({}) was selected",
        config.category,
        config.category.code()
    ));
    log_info(format!(
        "Consolidating IFC {} Services CSV files...",
        config.category
    ));

    let consolidated = consolidate_dir(config)?;
    let consolidated_path = config
        .output_dir()
        .join(consolidated_file_name(&config.date_stamp(), config.category));
    let consolidated_info = export(&consolidated, consolidated_path, OutputEncoding::Utf8, config)?;

    let mut unique_info = None;
    let mut doc_types = Vec::new();
    if config.category.needs_uniquify() {
        log_info("Producing a data set where each row contains a unique project ID...");
        // No input files means no schema to check
        let uniquified = if consolidated.columns().is_empty() {
            log_warning("Nothing to uniquify");
            Uniquified {
                table: Table::default(),
                doc_types: Vec::new(),
            }
        } else {
            Uniquifier::new(config.columns.clone()).run(&consolidated)?
        };
        let unique_path = config
            .output_dir()
            .join(unique_file_name(&config.date_stamp(), config.category));
        unique_info = Some(export(
            &uniquified.table,
            unique_path,
            OutputEncoding::Latin1,
            config,
        )?);
        doc_types = uniquified.doc_types;
    }

    Ok(RunSummary {
        config: config.clone(),
        consolidated: consolidated_info,
        unique: unique_info,
        doc_types,
        log: LOG_SINK.history(),
    })
}

fn export(
    table: &Table,
    path: PathBuf,
    encoding: OutputEncoding,
    config: &RunConfig,
) -> ConsolidateResult<OutputInfo> {
    if config.dry_run {
        log_info(format!("Dry run, skipping {}", path.display()));
    } else {
        write_csv_file(table, &path, encoding)?;
        log_success(format!(
            "Export is completed ({}). The file is ready in {}",
            encoding.name(),
            path.display()
        ));
    }

    Ok(OutputInfo {
        path,
        encoding,
        rows: table.len(),
        columns: table.columns().len(),
        written: !config.dry_run,
    })
}
