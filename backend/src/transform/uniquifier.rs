//! Collapse Investment rows into one row per project.
//!
//! Investment exports repeat a project once per disclosure document. The
//! text columns of each document type are moved side by side under a
//! prefixed name, so every project ends up on a single row.
//!
//! # Architecture
//!
//! ```text
//! Consolidated (one row per document)          Unique (one row per project)
//! ┌─────────────────────────────────┐          ┌──────────────────────────────────────────┐
//! │ PID: 1, Type: Appraisal, Desc: x│          │ PID: 1, Appraisal_Desc: x, Board_Desc: y │
//! │ PID: 1, Type: Board,     Desc: y│    →     ├──────────────────────────────────────────┤
//! │ PID: 2, Type: Board,     Desc: z│          │ PID: 2, Board_Desc: z                    │
//! └─────────────────────────────────┘          └──────────────────────────────────────────┘
//! ```
//!
//! # Text range
//!
//! The text columns are every column between two marker columns,
//! inclusive, in schema order. Adding a column between the markers in the
//! exports changes the range; a missing marker is an error.

use indexmap::IndexSet;

use crate::error::{SchemaError, SchemaResult};
use crate::logs::{log_info, log_info_indent, log_success};
use crate::models::{ColumnNames, ProjectCategory};
use crate::table::Table;

/// Name of the unique output file.
pub fn unique_file_name(date_stamp: &str, category: ProjectCategory) -> String {
    format!(
        "{} Unique_IFC_{}_disclosed_projects_text_data.csv",
        date_stamp,
        category.label()
    )
}

/// Column prefix for a document type: whitespace runs become `_`.
///
/// `"Environmental and Social Review Summary"` becomes
/// `"Environmental_and_Social_Review_Summary"`.
pub fn normalize_doc_type(doc_type: &str) -> String {
    doc_type.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Output of [`Uniquifier::run`]
#[derive(Debug, Clone)]
pub struct Uniquified {
    /// One row per identifier
    pub table: Table,
    /// Document types, in first-seen order
    pub doc_types: Vec<String>,
}

/// Column positions resolved against a table's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn contains(&self, idx: usize) -> bool {
        (self.start..=self.end).contains(&idx)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

/// Pivots per-document rows into one row per project.
#[derive(Debug, Clone, Default)]
pub struct Uniquifier {
    columns: ColumnNames,
}

impl Uniquifier {
    pub fn new(columns: ColumnNames) -> Self {
        Self { columns }
    }

    /// Locate the text range, failing if a marker is missing or misplaced.
    pub fn text_range(&self, table: &Table) -> SchemaResult<TextRange> {
        let start = table.require_column(&self.columns.text_start, "text range start")?;
        let end = table.require_column(&self.columns.text_end, "text range end")?;
        if end < start {
            return Err(SchemaError::InvertedTextRange {
                start: self.columns.text_start.clone(),
                end: self.columns.text_end.clone(),
            });
        }
        Ok(TextRange { start, end })
    }

    /// Build the unique table.
    pub fn run(&self, table: &Table) -> SchemaResult<Uniquified> {
        let range = self.text_range(table)?;
        let pid = table.require_column(&self.columns.project_id, "identifier")?;
        let doc = table.require_column(&self.columns.doc_type, "document type")?;
        for (idx, name) in [(pid, &self.columns.project_id), (doc, &self.columns.doc_type)] {
            if range.contains(idx) {
                return Err(SchemaError::ColumnInsideTextRange {
                    column: name.clone(),
                });
            }
        }

        // Representative rows without text or document type
        let mut unique = table.dedup_by(pid);
        let mut dropped: Vec<usize> = range.indices().collect();
        dropped.push(doc);
        unique.drop_columns(&dropped);

        let doc_types = distinct_doc_types(table, doc);
        log_info("Available document types are:");
        for doc_type in &doc_types {
            log_info_indent(doc_type.clone(), 1);
        }

        let projection: Vec<usize> = std::iter::once(pid).chain(range.indices()).collect();
        for doc_type in &doc_types {
            let prefix = format!("{}_", normalize_doc_type(doc_type));
            let mut subset = table
                .filter_rows(|row| row[doc].as_deref() == Some(doc_type.as_str()))
                .select(&projection);

            let id_column = &self.columns.project_id;
            subset.rename_columns(|name| {
                if name == id_column.as_str() {
                    name.to_string()
                } else {
                    format!("{}{}", prefix, name)
                }
            });

            unique.left_join(&subset, id_column)?;
        }

        unique.drop_empty_columns();
        log_success(format!(
            "{} unique projects, {} columns",
            unique.len(),
            unique.columns().len()
        ));

        Ok(Uniquified {
            table: unique,
            doc_types,
        })
    }
}

/// Non-null document types in first-seen order.
fn distinct_doc_types(table: &Table, doc: usize) -> Vec<String> {
    let types: IndexSet<&str> = table.column_values(doc).flatten().collect();
    types.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const HEADERS: &[&str] = &[
        "PID",
        "Project Name",
        "Type",
        "Desc",
        "Risk",
        "Mitigation",
        "Country",
    ];

    fn uniquifier() -> Uniquifier {
        Uniquifier::new(ColumnNames {
            project_id: "PID".into(),
            doc_type: "Type".into(),
            text_start: "Desc".into(),
            text_end: "Mitigation".into(),
        })
    }

    fn sample() -> Table {
        Table::from_text_rows(
            HEADERS,
            &[
                &["1", "Port", "Appraisal", "x", "r1", "", "Kenya"],
                &["2", "Bank", "Board Paper", "b2", "", "", "Peru"],
                &["1", "Port v2", "Board Paper", "y", "r2", "", ""],
                &["3", "Mill", "Appraisal", "m", "", "", "India"],
            ],
        )
    }

    #[test]
    fn test_minimal_example() {
        let t = Table::from_text_rows(
            &["PID", "Type", "Desc"],
            &[&["1", "Appraisal", "x"], &["1", "Board", "y"]],
        );
        let u = Uniquifier::new(ColumnNames {
            project_id: "PID".into(),
            doc_type: "Type".into(),
            text_start: "Desc".into(),
            text_end: "Desc".into(),
        });

        let out = u.run(&t).unwrap();

        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.columns(), &["PID", "Appraisal_Desc", "Board_Desc"]);
        assert_eq!(out.table.get(0, "Appraisal_Desc"), Some("x"));
        assert_eq!(out.table.get(0, "Board_Desc"), Some("y"));
    }

    #[test]
    fn test_one_row_per_identifier() {
        let out = uniquifier().run(&sample()).unwrap();

        let ids: Vec<&str> = out.table.column_values(0).flatten().collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        let distinct: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), out.table.len());
    }

    #[test]
    fn test_representative_row_is_first_occurrence() {
        let out = uniquifier().run(&sample()).unwrap();
        assert_eq!(out.table.get(0, "Project Name"), Some("Port"));
        assert_eq!(out.table.get(0, "Country"), Some("Kenya"));
    }

    #[test]
    fn test_text_columns_prefixed_per_doc_type() {
        let out = uniquifier().run(&sample()).unwrap();
        let t = &out.table;

        assert_eq!(t.get(0, "Appraisal_Desc"), Some("x"));
        assert_eq!(t.get(0, "Board_Paper_Desc"), Some("y"));
        assert_eq!(t.get(0, "Board_Paper_Risk"), Some("r2"));
        assert_eq!(t.get(1, "Appraisal_Desc"), None);
        assert_eq!(t.get(1, "Board_Paper_Desc"), Some("b2"));
        assert_eq!(t.get(2, "Board_Paper_Desc"), None);
    }

    #[test]
    fn test_schema_drops_source_and_empty_columns() {
        let out = uniquifier().run(&sample()).unwrap();
        assert_eq!(
            out.table.columns(),
            &[
                "PID",
                "Project Name",
                "Country",
                "Appraisal_Desc",
                "Appraisal_Risk",
                "Board_Paper_Desc",
                "Board_Paper_Risk",
            ]
        );
    }

    #[test]
    fn test_doc_types_first_seen_order() {
        let out = uniquifier().run(&sample()).unwrap();
        assert_eq!(out.doc_types, vec!["Appraisal", "Board Paper"]);
    }

    #[test]
    fn test_duplicate_identifier_and_type_keeps_first() {
        let t = Table::from_text_rows(
            HEADERS,
            &[
                &["1", "A", "Appraisal", "first", "", "", ""],
                &["1", "A", "Appraisal", "second", "", "", ""],
            ],
        );
        let out = uniquifier().run(&t).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.get(0, "Appraisal_Desc"), Some("first"));
    }

    #[test]
    fn test_null_doc_type_only_feeds_base() {
        let t = Table::from_text_rows(
            HEADERS,
            &[
                &["1", "A", "", "orphan", "", "", ""],
                &["2", "B", "Appraisal", "x", "", "", ""],
            ],
        );
        let out = uniquifier().run(&t).unwrap();

        assert_eq!(out.doc_types, vec!["Appraisal"]);
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.table.get(0, "Project Name"), Some("A"));
        assert_eq!(out.table.get(0, "Appraisal_Desc"), None);
    }

    #[test]
    fn test_colliding_prefixes_share_columns() {
        let t = Table::from_text_rows(
            HEADERS,
            &[
                &["1", "A", "Board Paper", "x", "", "", ""],
                &["2", "B", "Board  Paper", "y", "", "", ""],
            ],
        );
        let out = uniquifier().run(&t).unwrap();

        assert_eq!(out.doc_types.len(), 2);
        assert_eq!(out.table.get(0, "Board_Paper_Desc"), Some("x"));
        assert_eq!(out.table.get(1, "Board_Paper_Desc"), Some("y"));
    }

    #[test]
    fn test_missing_marker_is_error() {
        let t = Table::from_text_rows(&["PID", "Type", "Risk", "Mitigation"], &[]);
        let err = uniquifier().run(&t).unwrap_err();
        assert_eq!(err, SchemaError::missing("Desc", "text range start"));
    }

    #[test]
    fn test_missing_doc_type_is_error() {
        let t = Table::from_text_rows(&["PID", "Desc", "Mitigation"], &[&["1", "x", ""]]);
        let err = uniquifier().run(&t).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { ref column, .. } if column == "Type"));
    }

    #[test]
    fn test_inverted_range_is_error() {
        let t = Table::from_text_rows(&["PID", "Type", "Mitigation", "Desc"], &[]);
        let err = uniquifier().run(&t).unwrap_err();
        assert!(matches!(err, SchemaError::InvertedTextRange { .. }));
    }

    #[test]
    fn test_key_column_inside_range_is_error() {
        let t = Table::from_text_rows(&["Desc", "PID", "Mitigation", "Type"], &[]);
        let err = uniquifier().run(&t).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ColumnInsideTextRange {
                column: "PID".into()
            }
        );
    }

    #[test]
    fn test_header_only_table_drops_every_column() {
        let t = Table::from_text_rows(HEADERS, &[]);
        let out = uniquifier().run(&t).unwrap();
        assert!(out.table.is_empty());
        assert!(out.doc_types.is_empty());
        assert!(out.table.columns().is_empty());
    }

    #[test]
    fn test_normalize_doc_type() {
        assert_eq!(normalize_doc_type("Appraisal"), "Appraisal");
        assert_eq!(normalize_doc_type(" Board  Paper\t"), "Board_Paper");
        assert_eq!(normalize_doc_type("   "), "");
    }

    #[test]
    fn test_unique_file_name() {
        assert_eq!(
            unique_file_name("2026-10-16", ProjectCategory::Investment),
            "2026-10-16 Unique_IFC_Investment_disclosed_projects_text_data.csv"
        );
    }
}
