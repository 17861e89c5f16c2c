//! In-memory text table.
//!
//! Every cell is text or null, which keeps identifiers text-typed from the
//! moment they are read.
//!
//! ```text
//! columns: ["Project Number", "Document Type Description", ...]
//! rows:    [[Some("31245"), Some("Appraisal"), None, ...], ...]
//! ```

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::error::{SchemaError, SchemaResult};

/// A single value. `None` is null (an empty field in the CSV).
pub type Cell = Option<String>;

/// Ordered columns and rows of text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given schema.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals, treating `""` as null.
    pub fn from_text_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row.iter().map(|v| text_cell(v)).collect());
        }
        table
    }

    /// Append a row, padding with nulls or truncating to the schema width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`], failing with a [`SchemaError`].
    pub fn require_column(&self, name: &str, context: &str) -> SchemaResult<usize> {
        self.column_index(name)
            .ok_or_else(|| SchemaError::missing(name, context))
    }

    /// Value at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |r| r[idx].as_deref())
    }

    /// Rewrite every non-null cell of a column in place.
    pub fn map_column<F>(&mut self, idx: usize, mut f: F)
    where
        F: FnMut(String) -> Cell,
    {
        for row in &mut self.rows {
            if let Some(value) = row[idx].take() {
                row[idx] = f(value);
            }
        }
    }

    /// Concatenate tables vertically.
    ///
    /// The schema is the union of all schemas in first-seen order; a column
    /// absent from one table is null for that table's rows. Row order is kept.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: IndexSet<String> = IndexSet::new();
        for table in &tables {
            columns.extend(table.columns.iter().cloned());
        }

        let width = columns.len();
        let mut out = Table::new(Vec::new());
        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .filter_map(|c| columns.get_index_of(c))
                .collect();
            for row in table.rows {
                let mut wide = vec![None; width];
                for (cell, &target) in row.into_iter().zip(&mapping) {
                    wide[target] = cell;
                }
                out.rows.push(wide);
            }
        }
        out.columns = columns.into_iter().collect();
        out
    }

    /// New table keeping only the given column indices, in that order.
    pub fn select(&self, indices: &[usize]) -> Table {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Table { columns, rows }
    }

    /// New table keeping only rows matching the predicate.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Remove the given column indices.
    pub fn drop_columns(&mut self, indices: &[usize]) {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|i| !indices.contains(i))
            .collect();
        *self = self.select(&keep);
    }

    /// Keep the first row for each distinct value of the key column.
    pub fn dedup_by(&self, key: usize) -> Table {
        let mut seen: HashSet<Option<&str>> = HashSet::new();
        let mut rows = Vec::new();
        for row in &self.rows {
            if seen.insert(row[key].as_deref()) {
                rows.push(row.clone());
            }
        }
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rename columns through `f`.
    pub fn rename_columns<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for col in &mut self.columns {
            *col = f(col);
        }
    }

    /// Left join `right` onto `self` on the column `on`.
    ///
    /// Each left row matches the first right row with the same key, so the
    /// row count never changes. Right columns already present on the left
    /// only fill cells that are still null.
    pub fn left_join(&mut self, right: &Table, on: &str) -> SchemaResult<()> {
        let left_key = self.require_column(on, "left join key")?;
        let right_key = right.require_column(on, "right join key")?;

        let mut first_match: HashMap<Option<&str>, usize> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            first_match.entry(row[right_key].as_deref()).or_insert(i);
        }

        // Where each right column lands on the left
        let mut targets = Vec::new();
        for (ri, name) in right.columns.iter().enumerate() {
            if ri == right_key {
                continue;
            }
            let li = match self.column_index(name) {
                Some(li) => li,
                None => {
                    self.columns.push(name.clone());
                    for row in &mut self.rows {
                        row.push(None);
                    }
                    self.columns.len() - 1
                }
            };
            targets.push((ri, li));
        }

        for row in &mut self.rows {
            let Some(&matched) = first_match.get(&row[left_key].as_deref()) else {
                continue;
            };
            let source = &right.rows[matched];
            for &(ri, li) in &targets {
                if row[li].is_none() {
                    row[li] = source[ri].clone();
                }
            }
        }
        Ok(())
    }

    /// Drop every column that is null in all rows, so a table without rows
    /// loses its whole schema.
    pub fn drop_empty_columns(&mut self) {
        let empty: Vec<usize> = (0..self.columns.len())
            .filter(|&i| self.rows.iter().all(|r| r[i].is_none()))
            .collect();
        if !empty.is_empty() {
            self.drop_columns(&empty);
        }
    }
}

/// Turn a raw field into a cell; empty fields are null.
pub fn text_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_unions_columns() {
        let a = Table::from_text_rows(&["id", "name"], &[&["1", "a"], &["2", "b"]]);
        let b = Table::from_text_rows(&["id", "extra"], &[&["3", "x"]]);

        let out = Table::concat(vec![a, b]);

        assert_eq!(out.columns(), &["id", "name", "extra"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out.get(0, "extra"), None);
        assert_eq!(out.get(2, "id"), Some("3"));
        assert_eq!(out.get(2, "name"), None);
        assert_eq!(out.get(2, "extra"), Some("x"));
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let out = Table::concat(Vec::new());
        assert!(out.is_empty());
        assert!(out.columns().is_empty());
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Some("1".into())]);
        t.push_row(vec![Some("1".into()), Some("2".into()), Some("3".into())]);
        assert_eq!(t.rows()[0], vec![Some("1".to_string()), None]);
        assert_eq!(t.rows()[1].len(), 2);
    }

    #[test]
    fn test_dedup_keeps_first() {
        let t = Table::from_text_rows(
            &["id", "v"],
            &[&["1", "first"], &["2", "x"], &["1", "second"], &["", "n1"], &["", "n2"]],
        );
        let d = t.dedup_by(0);
        assert_eq!(d.len(), 3);
        assert_eq!(d.get(0, "v"), Some("first"));
        assert_eq!(d.get(2, "v"), Some("n1"));
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let mut left = Table::from_text_rows(&["id", "name"], &[&["1", "a"], &["2", "b"]]);
        let right = Table::from_text_rows(&["id", "score"], &[&["2", "9"], &["3", "7"]]);

        left.left_join(&right, "id").unwrap();

        assert_eq!(left.len(), 2);
        assert_eq!(left.columns(), &["id", "name", "score"]);
        assert_eq!(left.get(0, "score"), None);
        assert_eq!(left.get(1, "score"), Some("9"));
    }

    #[test]
    fn test_left_join_uses_first_match_only() {
        let mut left = Table::from_text_rows(&["id"], &[&["1"]]);
        let right = Table::from_text_rows(&["id", "v"], &[&["1", "first"], &["1", "second"]]);

        left.left_join(&right, "id").unwrap();

        assert_eq!(left.len(), 1);
        assert_eq!(left.get(0, "v"), Some("first"));
    }

    #[test]
    fn test_left_join_shared_column_fills_nulls() {
        let mut left = Table::from_text_rows(&["id", "v"], &[&["1", "keep"], &["2", ""]]);
        let right = Table::from_text_rows(&["id", "v"], &[&["1", "new"], &["2", "fill"]]);

        left.left_join(&right, "id").unwrap();

        assert_eq!(left.columns(), &["id", "v"]);
        assert_eq!(left.get(0, "v"), Some("keep"));
        assert_eq!(left.get(1, "v"), Some("fill"));
    }

    #[test]
    fn test_left_join_missing_key() {
        let mut left = Table::from_text_rows(&["id"], &[&["1"]]);
        let right = Table::from_text_rows(&["pid"], &[&["1"]]);
        let err = left.left_join(&right, "id").unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_drop_empty_columns() {
        let mut t = Table::from_text_rows(&["a", "b", "c"], &[&["1", "", ""], &["", "", "x"]]);
        t.drop_empty_columns();
        assert_eq!(t.columns(), &["a", "c"]);
        assert_eq!(t.rows()[1], vec![None, Some("x".to_string())]);
    }

    #[test]
    fn test_drop_empty_columns_without_rows() {
        let mut t = Table::from_text_rows(&["a", "b"], &[]);
        t.drop_empty_columns();
        assert!(t.columns().is_empty());
        assert!(t.is_empty());
    }

    #[test]
    fn test_concat_repeated_columns_keep_first_position() {
        let a = Table::from_text_rows(&["id", "name"], &[&["1", "a"]]);
        let b = Table::from_text_rows(&["extra", "name", "id"], &[&["x", "b", "2"]]);

        let out = Table::concat(vec![a, b]);

        assert_eq!(out.columns(), &["id", "name", "extra"]);
        assert_eq!(out.get(1, "id"), Some("2"));
        assert_eq!(out.get(1, "name"), Some("b"));
        assert_eq!(out.get(1, "extra"), Some("x"));
    }

    #[test]
    fn test_map_column_skips_nulls() {
        let mut t = Table::from_text_rows(&["id"], &[&[" 7 "], &[""]]);
        t.map_column(0, |v| Some(v.trim().to_string()));
        assert_eq!(t.get(0, "id"), Some("7"));
        assert_eq!(t.get(1, "id"), None);
    }
}
