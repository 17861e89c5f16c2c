//! Run configuration.
//!
//! Values are resolved in layers: built-in defaults, then environment
//! variables (a `.env` file is loaded by the binary), then command line flags.
//!
//! | Variable             | Meaning                                   |
//! |----------------------|-------------------------------------------|
//! | `IFC_BASE_DIR`       | directory holding `<category>_Services`   |
//! | `IFC_OUTPUT_DIR`     | output subdirectory name                  |
//! | `IFC_INPUT_ENCODING` | `latin1` or `auto`                        |

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::models::{ColumnNames, InputEncoding, ProjectCategory};

/// Default output subdirectory, relative to the base directory
pub const DEFAULT_OUTPUT_DIR: &str = "Consolidated_data_set";

/// Date format used in output file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything a run needs to know
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Investment or Advisory
    pub category: ProjectCategory,
    /// Directory containing `<category>_Services` and the output folder
    pub base_dir: PathBuf,
    /// Output subdirectory name
    pub output_dir_name: String,
    /// Date stamped into output file names
    pub date: NaiveDate,
    /// How input files are decoded
    pub input_encoding: InputEncoding,
    /// Key column names
    pub columns: ColumnNames,
    /// Run both phases without writing CSV files
    pub dry_run: bool,
}

impl RunConfig {
    /// Defaults: current directory, today's date, ISO-8859-1 input.
    pub fn new(category: ProjectCategory) -> Self {
        Self {
            category,
            base_dir: PathBuf::from("."),
            output_dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            date: Local::now().date_naive(),
            input_encoding: InputEncoding::default(),
            columns: ColumnNames::default(),
            dry_run: false,
        }
    }

    /// Apply `IFC_*` environment variables on top of the current values.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Apply variables from an arbitrary lookup.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("IFC_BASE_DIR").filter(|v| !v.is_empty()) {
            self.base_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("IFC_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            self.output_dir_name = name;
        }
        if let Some(enc) = lookup("IFC_INPUT_ENCODING").filter(|v| !v.is_empty()) {
            self.input_encoding = enc.parse()?;
        }
        Ok(self)
    }

    /// Folder scanned for CSV files
    pub fn input_dir(&self) -> PathBuf {
        self.base_dir.join(self.category.services_dir_name())
    }

    /// Folder receiving output files
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir_name)
    }

    /// Date as it appears in file names
    pub fn date_stamp(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ConfigError::InvalidDate(value.to_string()))
}
