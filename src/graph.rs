use crate::dataset::Dataset;
use crate::error::{DashboardError, DashboardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Fraction of the radius each pie slice is pulled away from the centre
pub const PIE_PULL: f64 = 0.1;

/// Available chart types supported by the dashboard
///
/// This enum defines the visualization formats a page can switch between.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    /// Bar chart - One bar per row, coloured by x value
    Bar,

    /// Line chart - Points connected in x order
    Line,

    /// Area chart - Like a line chart with the area down to zero filled in
    Area,

    /// Pie chart - One slice per x value, sized by the summed y values
    Pie,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [ChartType::Bar, ChartType::Line, ChartType::Area, ChartType::Pie];

    pub fn tag(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
        }
    }

    /// Label shown in the chart-type selector
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Bar => "Gráfico de Barras",
            ChartType::Line => "Gráfico de Linha",
            ChartType::Area => "Gráfico de Área",
            ChartType::Pie => "Gráfico de Pizza",
        }
    }
}

impl FromStr for ChartType {
    type Err = DashboardError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| DashboardError::UnsupportedChartType(tag.to_string()))
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One plotted value on a categorical x axis
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Point {
    pub x: String,
    pub y: f64,
}

/// A named run of points drawn with a single colour
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

/// One pie slice
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Slice {
    pub name: String,
    pub value: f64,
    /// Share of the whole pie, between 0 and 1
    pub fraction: f64,
    /// Pull-out offset as a fraction of the radius
    pub pull: f64,
    /// Text drawn next to the slice: percentage and name
    pub label: String,
}

/// Plotted data of a chart
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum ChartData {
    /// Bar, line and area charts
    Cartesian {
        /// x categories in order of first appearance
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Pie { slices: Vec<Slice> },
}

/// A fully determined chart, ready to be drawn or serialised
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Chart {
    pub title: String,
    pub chart_type: ChartType,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl Chart {
    /// Number of bars (or points) across every series; zero for pie charts
    pub fn point_count(&self) -> usize {
        match &self.data {
            ChartData::Cartesian { series, .. } => series.iter().map(|s| s.points.len()).sum(),
            ChartData::Pie { .. } => 0,
        }
    }

    pub fn slices(&self) -> &[Slice] {
        match &self.data {
            ChartData::Pie { slices } => slices,
            ChartData::Cartesian { .. } => &[],
        }
    }
}

/// Creates a chart from tabular data
///
/// This is the main entry point of the chart renderer. It extracts the x and
/// y columns from `table` and shapes them according to the chart type.
///
/// For pie charts the columns change role: `x_column` supplies the slice
/// names and `y_column` the values summed into each slice.
///
/// # Arguments
/// * `table` - Rows to plot, usually the output of the aggregator
/// * `x_column` - Column for the x axis (slice names for pie charts)
/// * `y_column` - Numeric column for the values
/// * `chart_type` - One of `bar`, `line`, `area`, `pie`
/// * `title` - Title displayed at the top of the chart
///
/// # Returns
/// * `DashboardResult<Chart>` - The chart description
///
/// # Errors
/// * `UnsupportedChartType` for any other tag
/// * `ColumnNotFound` if either column is missing from `table`
/// * `NonNumericValue` if a y cell holds non-numeric text
///
/// # Examples
/// ```
/// use dashboard::cell::CellValue;
/// use dashboard::dataset::Dataset;
/// use dashboard::graph::render;
///
/// let table = Dataset::new(
///     vec!["Mês".into(), "Insucessos".into()],
///     vec![
///         vec!["Jan".into(), CellValue::Number(3.0)],
///         vec!["Fev".into(), CellValue::Number(1.0)],
///     ],
/// );
/// let chart = render(&table, "Mês", "Insucessos", "line", "Insucessos por Mês").unwrap();
/// assert_eq!(chart.point_count(), 2);
/// ```
pub fn render(
    table: &Dataset,
    x_column: &str,
    y_column: &str,
    chart_type: &str,
    title: &str,
) -> DashboardResult<Chart> {
    let chart_type: ChartType = chart_type.parse()?;
    let rows = extract_rows(table, x_column, y_column)?;

    let data = match chart_type {
        ChartType::Bar => bar_data(&rows),
        ChartType::Line | ChartType::Area => line_data(&rows, y_column),
        ChartType::Pie => pie_data(&rows),
    };

    Ok(Chart {
        title: title.to_string(),
        chart_type,
        x_label: x_column.to_string(),
        y_label: y_column.to_string(),
        data,
    })
}

/// Pulls (x label, y value) pairs out of the table in row order
fn extract_rows(
    table: &Dataset,
    x_column: &str,
    y_column: &str,
) -> DashboardResult<Vec<(String, f64)>> {
    let x_idx = table.column_index(x_column)?;
    let y_idx = table.column_index(y_column)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(row_idx, row)| -> DashboardResult<(String, f64)> {
            Ok((row[x_idx].as_label(), table.numeric_value(row_idx, y_idx)?))
        })
        .collect()
}

/// Distinct x labels in first-appearance order, with a lookup of their position
fn categories(rows: &[(String, f64)]) -> (Vec<String>, HashMap<String, usize>) {
    let mut order = Vec::new();
    let mut index = HashMap::new();
    for (x, _) in rows {
        if !index.contains_key(x) {
            index.insert(x.clone(), order.len());
            order.push(x.clone());
        }
    }
    (order, index)
}

// One series per x value so every category gets its own colour
fn bar_data(rows: &[(String, f64)]) -> ChartData {
    let (categories, index) = categories(rows);
    let mut series: Vec<Series> = categories
        .iter()
        .map(|name| Series {
            name: name.clone(),
            points: Vec::new(),
        })
        .collect();

    for (x, y) in rows {
        series[index[x]].points.push(Point { x: x.clone(), y: *y });
    }

    ChartData::Cartesian { categories, series }
}

fn line_data(rows: &[(String, f64)], y_column: &str) -> ChartData {
    let (categories, index) = categories(rows);
    let mut points: Vec<Point> = rows
        .iter()
        .map(|(x, y)| Point { x: x.clone(), y: *y })
        .collect();
    // stable, so rows sharing a month keep their source order
    points.sort_by_key(|p| index[&p.x]);

    ChartData::Cartesian {
        categories,
        series: vec![Series {
            name: y_column.to_string(),
            points,
        }],
    }
}

fn pie_data(rows: &[(String, f64)]) -> ChartData {
    let (names, index) = categories(rows);
    let mut totals = vec![0.0; names.len()];
    for (x, y) in rows {
        totals[index[x]] += y;
    }

    let grand_total: f64 = totals.iter().sum();
    let slices = names
        .into_iter()
        .zip(totals)
        .map(|(name, value)| {
            let fraction = if grand_total != 0.0 {
                value / grand_total
            } else {
                0.0
            };
            Slice {
                label: format!("{:.1}% {}", fraction * 100.0, name),
                name,
                value,
                fraction,
                pull: PIE_PULL,
            }
        })
        .collect();

    ChartData::Pie { slices }
}
