use crate::cell::CellValue;
use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};

/// Column holding the month label every chart is plotted against
pub const MONTH_COLUMN: &str = "Mês";

/// In-memory tabular dataset
///
/// Rows are stored in source order and every row has exactly one cell per
/// column. A `Dataset` is built once and never mutated afterwards; the same
/// type also carries the summary tables produced by the aggregator.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Creates a dataset from a header and its rows
    ///
    /// Rows shorter than the header are padded with empty cells and longer
    /// rows are truncated, so every row lines up with `columns`.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Dataset { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the header
    ///
    /// # Errors
    /// * `DashboardError::ColumnNotFound` if no column carries that name
    pub fn column_index(&self, name: &str) -> DashboardResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DashboardError::ColumnNotFound(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Reads a metric cell as a number
    ///
    /// Empty cells count as zero. Text is accepted when it parses as a number
    /// and rejected otherwise.
    ///
    /// # Errors
    /// * `DashboardError::NonNumericValue` with the 1-based data row number
    pub fn numeric_value(&self, row: usize, col: usize) -> DashboardResult<f64> {
        let cell = self.cell(row, col).unwrap_or(&CellValue::Empty);
        cell.as_number()
            .ok_or_else(|| DashboardError::NonNumericValue {
                column: self.columns[col].clone(),
                row: row + 1,
                value: cell.as_label(),
            })
    }
}
