//! CSV reading with legacy encoding support.
//!
//! Disclosure exports are ISO-8859-1 files with a header row. Files are
//! decoded to UTF-8 first, then parsed with the `csv` crate into a [`Table`].

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::InputEncoding;
use crate::table::{Cell, Table};

/// Field values read as null, besides the empty field.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Result of reading one file
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows
    pub table: Table,
    /// Encoding used to decode the file
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes using the named encoding.
///
/// Unknown names fall back to ISO-8859-1, which accepts any byte sequence.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8.decode(bytes).0.into_owned(),
        // The WHATWG mapping for the iso-8859-1 label is windows-1252
        _ => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

/// Decode bytes according to the configured strategy.
///
/// Returns the text and the name of the encoding actually used.
pub fn decode_input(bytes: &[u8], strategy: InputEncoding) -> (String, String) {
    let encoding = match strategy {
        InputEncoding::Latin1 => "iso-8859-1".to_string(),
        InputEncoding::Auto => match detect_encoding(bytes).as_str() {
            "utf-8" => "utf-8".to_string(),
            "windows-1252" => "windows-1252".to_string(),
            _ => "iso-8859-1".to_string(),
        },
    };
    (decode_content(bytes, &encoding), encoding)
}

/// Parse decoded CSV text into a table.
///
/// The first record is the header. Repeated header names get a `.N`
/// suffix so every column stays addressable. Short rows are padded
/// with nulls.
pub fn parse_table(content: &str) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = unique_headers(reader.headers()?.iter());
    let mut table = Table::new(headers);

    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_field).collect());
    }

    Ok(table)
}

/// Read and parse one CSV file.
pub fn read_csv_file<P: AsRef<Path>>(path: P, strategy: InputEncoding) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (content, encoding) = decode_input(&bytes, strategy);
    let table = parse_table(&content).map_err(|source| CsvError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ParseResult { table, encoding })
}

fn parse_field(raw: &str) -> Cell {
    if raw.is_empty() || NA_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for name in raw {
        let mut candidate = name.to_string();
        let mut n = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        headers.push(candidate);
    }
    headers
}
