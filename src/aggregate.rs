//! Grouping of dataset rows by a dimension and month.

use crate::cell::CellValue;
use crate::dataset::{Dataset, MONTH_COLUMN};
use crate::error::DashboardResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Categorical axis used on the analysis pages
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Operator,
    Unit,
}

impl Dimension {
    /// Dataset column holding this dimension
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::Operator => "Operador",
            Dimension::Unit => "Unidade",
        }
    }
}

/// Summarises `metric` for charting
///
/// Without a dimension the dataset is passed through untouched: single-metric
/// pages plot the raw rows, month against metric value.
///
/// With a dimension, rows are grouped by (dimension value, month) and the
/// metric is summed inside each group. The result has the columns
/// `[dimension, Mês, metric]` and one row per distinct pair, in order of first
/// appearance in the source. Rows with an empty dimension or month cell do not
/// belong to any group.
///
/// # Arguments
/// * `dataset` - Source rows
/// * `dimension` - Optional grouping dimension
/// * `metric` - Name of the numeric column to summarise
///
/// # Errors
/// * `ColumnNotFound` if the metric, the dimension or the month column is missing
/// * `NonNumericValue` if a metric cell holds text that is not a number
///
/// # Examples
/// ```
/// use dashboard::aggregate::{aggregate, Dimension};
/// use dashboard::cell::CellValue;
/// use dashboard::dataset::Dataset;
///
/// let ds = Dataset::new(
///     vec!["Mês".into(), "Operador".into(), "Vendas".into()],
///     vec![
///         vec!["Jan".into(), "A".into(), CellValue::Number(10.0)],
///         vec!["Jan".into(), "A".into(), CellValue::Number(2.0)],
///     ],
/// );
/// let table = aggregate(&ds, Some(Dimension::Operator), "Vendas").unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.rows()[0][2], CellValue::Number(12.0));
/// ```
pub fn aggregate<'a>(
    dataset: &'a Dataset,
    dimension: Option<Dimension>,
    metric: &str,
) -> DashboardResult<Cow<'a, Dataset>> {
    let metric_idx = dataset.column_index(metric)?;

    let Some(dimension) = dimension else {
        return Ok(Cow::Borrowed(dataset));
    };

    let dim_idx = dataset.column_index(dimension.column())?;
    let month_idx = dataset.column_index(MONTH_COLUMN)?;

    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<(CellValue, CellValue, f64)> = Vec::new();

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let (dim_cell, month_cell) = (&row[dim_idx], &row[month_idx]);
        if dim_cell.is_empty() || month_cell.is_empty() {
            continue;
        }

        let value = dataset.numeric_value(row_idx, metric_idx)?;
        let key = (dim_cell.as_label(), month_cell.as_label());
        match positions.get(&key) {
            Some(&pos) => groups[pos].2 += value,
            None => {
                positions.insert(key, groups.len());
                groups.push((dim_cell.clone(), month_cell.clone(), value));
            }
        }
    }

    let columns = vec![
        dimension.column().to_string(),
        MONTH_COLUMN.to_string(),
        metric.to_string(),
    ];
    let rows = groups
        .into_iter()
        .map(|(dim, month, total)| vec![dim, month, CellValue::Number(total)])
        .collect();

    Ok(Cow::Owned(Dataset::new(columns, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    fn row(month: &str, operator: &str, unit: &str, sales: f64) -> Vec<CellValue> {
        vec![month.into(), operator.into(), unit.into(), sales.into()]
    }

    fn sales() -> Dataset {
        Dataset::new(
            vec![
                "Mês".into(),
                "Operador".into(),
                "Unidade".into(),
                "Vendas".into(),
            ],
            vec![
                row("Jan", "A", "Centro", 10.0),
                row("Jan", "B", "Centro", 5.0),
                row("Feb", "A", "Norte", 7.0),
            ],
        )
    }

    fn labels(table: &Dataset) -> Vec<Vec<String>> {
        table
            .rows()
            .iter()
            .map(|r| r.iter().map(CellValue::as_label).collect())
            .collect()
    }

    #[test]
    fn groups_by_operator_and_month() {
        let ds = sales();
        let table = aggregate(&ds, Some(Dimension::Operator), "Vendas").unwrap();

        assert_eq!(table.columns(), ["Operador", "Mês", "Vendas"]);
        assert_eq!(
            labels(&table),
            vec![
                vec!["A", "Jan", "10"],
                vec!["B", "Jan", "5"],
                vec!["A", "Feb", "7"],
            ]
        );
    }

    #[test]
    fn sums_rows_sharing_a_group() {
        let mut rows = sales().rows().to_vec();
        rows.push(row("Jan", "C", "Centro", 2.5));
        rows.push(row("Feb", "D", "Norte", 1.0));
        let ds = Dataset::new(sales().columns().to_vec(), rows);

        let table = aggregate(&ds, Some(Dimension::Unit), "Vendas").unwrap();
        assert_eq!(
            labels(&table),
            vec![vec!["Centro", "Jan", "17.5"], vec!["Norte", "Feb", "8"]]
        );

        let total: f64 = table.rows().iter().filter_map(|r| r[2].as_number()).sum();
        assert_eq!(total, 25.5);
    }

    #[test]
    fn no_dimension_is_identity() {
        let ds = sales();
        let table = aggregate(&ds, None, "Vendas").unwrap();
        assert!(matches!(table, Cow::Borrowed(_)));
        assert_eq!(*table, ds);
    }

    #[test]
    fn missing_columns_are_reported() {
        let ds = sales();
        assert_eq!(
            aggregate(&ds, None, "Meta de Vendas").unwrap_err(),
            DashboardError::ColumnNotFound("Meta de Vendas".to_string())
        );

        let no_units = Dataset::new(
            vec!["Mês".into(), "Vendas".into()],
            vec![vec!["Jan".into(), 1.0.into()]],
        );
        assert_eq!(
            aggregate(&no_units, Some(Dimension::Unit), "Vendas").unwrap_err(),
            DashboardError::ColumnNotFound("Unidade".to_string())
        );
    }

    #[test]
    fn empty_metric_counts_as_zero_and_text_fails() {
        let ds = Dataset::new(
            sales().columns().to_vec(),
            vec![
                vec!["Jan".into(), "A".into(), "Centro".into(), CellValue::Empty],
                vec!["Jan".into(), "A".into(), "Centro".into(), 4.0.into()],
                vec![CellValue::Empty, "B".into(), "Centro".into(), 9.0.into()],
            ],
        );
        let table = aggregate(&ds, Some(Dimension::Operator), "Vendas").unwrap();
        assert_eq!(labels(&table), vec![vec!["A", "Jan", "4"]]);

        let bad = Dataset::new(
            sales().columns().to_vec(),
            vec![vec!["Jan".into(), "A".into(), "Centro".into(), "dez".into()]],
        );
        assert!(matches!(
            aggregate(&bad, Some(Dimension::Operator), "Vendas"),
            Err(DashboardError::NonNumericValue { row: 1, .. })
        ));
    }
}
