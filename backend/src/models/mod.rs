//! Domain models for the consolidation pipeline.
//!
//! - [`ProjectCategory`] - Investment or Advisory Services
//! - [`ColumnNames`] - names of the key columns in the disclosure exports
//! - [`InputEncoding`] - how input files are decoded

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConsolidateError};

// =============================================================================
// Project Category
// =============================================================================

/// Category of disclosed IFC projects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectCategory {
    /// Investment Services (`IS`).
    Investment,
    /// Advisory Services (`AS`).
    Advisory,
}

impl ProjectCategory {
    /// Parse the command line code (`IS` or `AS`).
    pub fn from_code(code: &str) -> Result<Self, ConsolidateError> {
        match code {
            "IS" => Ok(ProjectCategory::Investment),
            "AS" => Ok(ProjectCategory::Advisory),
            other => Err(ConsolidateError::InvalidArgument(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProjectCategory::Investment => "IS",
            ProjectCategory::Advisory => "AS",
        }
    }

    /// Label used in folder and file names.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectCategory::Investment => "Investment",
            ProjectCategory::Advisory => "Advisory",
        }
    }

    /// Name of the folder holding this category's exports.
    pub fn services_dir_name(&self) -> String {
        format!("{}_Services", self.label())
    }

    /// Only Investment exports repeat a project once per document type.
    pub fn needs_uniquify(&self) -> bool {
        matches!(self, ProjectCategory::Investment)
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Column Names
// =============================================================================

/// Key column names of the disclosure exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnNames {
    /// Project identifier.
    pub project_id: String,
    /// Document type classification.
    pub doc_type: String,
    /// First column of the text range (inclusive).
    pub text_start: String,
    /// Last column of the text range (inclusive).
    pub text_end: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            project_id: "Project Number".to_string(),
            doc_type: "Document Type Description".to_string(),
            text_start: "Project Description".to_string(),
            text_end: "Mitigation Measures".to_string(),
        }
    }
}

// =============================================================================
// Input Encoding
// =============================================================================

/// Decoding strategy for input CSV files.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// ISO-8859-1, what the disclosure site exports.
    #[default]
    Latin1,
    /// Detect per file, falling back to ISO-8859-1.
    Auto,
}

impl FromStr for InputEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" => Ok(InputEncoding::Latin1),
            "auto" => Ok(InputEncoding::Auto),
            _ => Err(ConfigError::UnknownEncoding(s.to_string())),
        }
    }
}
