//! CSV export.
//!
//! Output files start with an unnamed column holding the 0-based row
//! index, followed by the table columns. Nulls are written as empty fields.
//!
//! Two encodings are supported because downstream consumers expect the
//! consolidated file in UTF-8 and the unique file in ISO-8859-1.
//!
//! The legacy file is encoded with the WHATWG mapping of the `iso-8859-1`
//! label, which is windows-1252: bytes 0x80-0x9F hold printable characters
//! such as `€` (0x80) and `’` (0x92) instead of C1 control codes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::table::Table;

/// Encoding of an output file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputEncoding {
    Utf8,
    /// ISO-8859-1 as windows-1252. Values outside that code page are rejected.
    Latin1,
}

impl OutputEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "utf-8",
            OutputEncoding::Latin1 => "iso-8859-1",
        }
    }
}

/// Render a table as CSV bytes in the given encoding.
pub fn to_csv_bytes(table: &Table, encoding: OutputEncoding) -> CsvResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("").chain(table.columns().iter().map(String::as_str));
    writer.write_record(header).map_err(write_error)?;

    for (i, row) in table.rows().iter().enumerate() {
        if encoding == OutputEncoding::Latin1 {
            check_encodable(table, i, row)?;
        }
        let index = i.to_string();
        let fields = std::iter::once(index.as_str())
            .chain(row.iter().map(|c| c.as_deref().unwrap_or("")));
        writer.write_record(fields).map_err(write_error)?;
    }

    let utf8 = writer
        .into_inner()
        .map_err(|e| write_error(csv::Error::from(e.into_error())))?;

    match encoding {
        OutputEncoding::Utf8 => Ok(utf8),
        OutputEncoding::Latin1 => {
            // Headers are checked here; cells were checked row by row
            let text = String::from_utf8_lossy(&utf8);
            let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(&text);
            if had_errors {
                return Err(CsvError::Unencodable {
                    line: 1,
                    column: first_unencodable_header(table),
                });
            }
            Ok(bytes.into_owned())
        }
    }
}

/// Write a table to `path`, creating parent directories as needed.
pub fn write_csv_file(table: &Table, path: &Path, encoding: OutputEncoding) -> CsvResult<()> {
    let bytes = to_csv_bytes(table, encoding)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CsvError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_windows_1252(value: &str) -> bool {
    !encoding_rs::WINDOWS_1252.encode(value).2
}

fn check_encodable(table: &Table, row_idx: usize, row: &[Option<String>]) -> CsvResult<()> {
    for (col, cell) in row.iter().enumerate() {
        if let Some(value) = cell {
            if !is_windows_1252(value) {
                return Err(CsvError::Unencodable {
                    // +1 for the header, +1 for 1-based lines
                    line: row_idx + 2,
                    column: table.columns()[col].clone(),
                });
            }
        }
    }
    Ok(())
}

fn first_unencodable_header(table: &Table) -> String {
    table
        .columns()
        .iter()
        .find(|c| !is_windows_1252(c))
        .cloned()
        .unwrap_or_default()
}

fn write_error(source: csv::Error) -> CsvError {
    CsvError::Parse {
        path: "<output buffer>".into(),
        source,
    }
}
