//! Merge every CSV export of a category into one table.
//!
//! ```text
//! Investment_Services/
//!   export_2019.csv  ─┐
//!   export_2020.csv  ─┼─▶ one table (union of columns, rows in file order)
//!   export_2021.csv  ─┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::{ConsolidateError, ConsolidateResult, CsvResult, SchemaResult};
use crate::logs::{log_info_indent, log_success, log_warning};
use crate::models::{ColumnNames, InputEncoding, ProjectCategory};
use crate::parser::read_csv_file;
use crate::table::Table;

/// Name of the consolidated output file.
pub fn consolidated_file_name(date_stamp: &str, category: ProjectCategory) -> String {
    format!(
        "{} IFC_{}_disclosed_projects_text_data.csv",
        date_stamp,
        category.label()
    )
}

/// List `*.csv` files directly inside `dir`, sorted by file name.
pub fn list_csv_files(dir: &Path) -> ConsolidateResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConsolidateError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read each file into a table, in order.
pub fn read_tables(files: &[PathBuf], encoding: InputEncoding) -> CsvResult<Vec<Table>> {
    files
        .iter()
        .map(|path| -> CsvResult<Table> {
            let parsed = read_csv_file(path, encoding)?;
            log_info_indent(
                format!(
                    "{} ({} rows, {})",
                    display_name(path),
                    parsed.table.len(),
                    parsed.encoding
                ),
                1,
            );
            Ok(parsed.table)
        })
        .collect()
}

/// Concatenate tables and normalize the identifier column.
///
/// Rows keep their order and get a dense 0-based index (their position).
/// Identifiers are trimmed text. An empty result is returned as is, even
/// without an identifier column.
pub fn consolidate_tables(tables: Vec<Table>, columns: &ColumnNames) -> SchemaResult<Table> {
    let mut table = Table::concat(tables);
    if table.is_empty() {
        return Ok(table);
    }

    let pid = table.require_column(&columns.project_id, "identifier")?;
    table.map_column(pid, |id| {
        let trimmed = id.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });
    Ok(table)
}

/// Read and consolidate every CSV file in the category's input folder.
pub fn consolidate_dir(config: &RunConfig) -> ConsolidateResult<Table> {
    let input_dir = config.input_dir();
    let files = list_csv_files(&input_dir)?;

    if files.is_empty() {
        log_warning(format!("No CSV files found in {}", input_dir.display()));
    }

    let tables = read_tables(&files, config.input_encoding)?;
    let table = consolidate_tables(tables, &config.columns)?;

    log_success(format!(
        "Consolidated {} files into {} rows, {} columns",
        files.len(),
        table.len(),
        table.columns().len()
    ));
    Ok(table)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
