//! Tabular view of the catalog's CSV index.

use csv::ReaderBuilder;

use crate::error::{CatalogError, Result};

/// The parsed CSV index: a header row naming the columns and the data rows.
///
/// Values are kept as strings; the catalog layer does not interpret them
/// beyond equality comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CatalogTable {
    /// Parse a CSV document into a table.
    ///
    /// The first record is the header. Records with a field count different
    /// from the header are an error; blank lines are skipped.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| CatalogError::index(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        if columns.is_empty() {
            return Err(CatalogError::index("index has no header row"));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::index(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { columns, rows })
    }

    /// Build a table directly from columns and rows (used by `search` and
    /// by tests).
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(CatalogError::index("row width does not match columns"));
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in data row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Distinct values of a column, in first-seen row order.
    pub fn distinct(&self, column: &str) -> Result<Vec<String>> {
        let col = self
            .column_index(column)
            .ok_or_else(|| CatalogError::MissingColumn(column.to_string()))?;
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|v| v == &row[col]) {
                seen.push(row[col].clone());
            }
        }
        Ok(seen)
    }

    /// Filter rows by column equality predicates (all must match).
    ///
    /// Returns a new table with the same columns; the receiver is unchanged.
    pub fn search(&self, predicates: &[(&str, &str)]) -> Result<CatalogTable> {
        let mut resolved = Vec::with_capacity(predicates.len());
        for (column, value) in predicates {
            let col = self
                .column_index(column)
                .ok_or_else(|| CatalogError::MissingColumn((*column).to_string()))?;
            resolved.push((col, *value));
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| resolved.iter().all(|(col, value)| row[*col] == *value))
            .cloned()
            .collect();
        Ok(CatalogTable {
            columns: self.columns.clone(),
            rows,
        })
    }
}
