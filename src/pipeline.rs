use crate::aggregate::aggregate;
use crate::catalog::{self, DEFAULT_CHART_TYPE, PageKind};
use crate::dataset::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::graph::{Chart, ChartType, render};
use serde::Deserialize;

/// Selector state of one page at the moment a chart is requested
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ChartRequest {
    #[serde(default)]
    pub page: String,
    pub chart_type: Option<String>,
    /// Ignored on single-metric pages
    pub metric: Option<String>,
}

impl ChartRequest {
    pub fn new(page: impl Into<String>) -> Self {
        ChartRequest {
            page: page.into(),
            ..Default::default()
        }
    }

    pub fn chart_type(mut self, chart_type: impl Into<String>) -> Self {
        self.chart_type = Some(chart_type.into());
        self
    }

    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }
}

/// Recomputes the chart shown on a page
///
/// Called whenever a selector changes. Looks the page up in the catalog,
/// aggregates the dataset for the selected metric and renders the selected
/// chart type. Nothing is cached; identical requests give identical charts.
///
/// # Errors
/// * `PageNotFound` if the page key is not in the catalog
/// * `UnsupportedMetric` if an analysis page is asked for a metric outside
///   its selector
/// * `UnsupportedChartType`, `ColumnNotFound`, `NonNumericValue` from the
///   aggregator and renderer
pub fn recompute(dataset: &Dataset, request: &ChartRequest) -> DashboardResult<Chart> {
    let page = catalog::page(&request.page)
        .ok_or_else(|| DashboardError::PageNotFound(request.page.clone()))?;

    let tag = request
        .chart_type
        .as_deref()
        .unwrap_or(DEFAULT_CHART_TYPE.tag());
    let chart_type: ChartType = tag.parse()?;

    let (dimension, metric) = match page.kind {
        PageKind::Metric { metric } => (None, metric),
        PageKind::Analysis { dimension } => {
            let metric = request
                .metric
                .as_deref()
                .unwrap_or(catalog::default_metric());
            if !catalog::is_metric_option(metric) {
                return Err(DashboardError::UnsupportedMetric(metric.to_string()));
            }
            (Some(dimension), metric)
        }
    };

    let table = aggregate(dataset, dimension, metric)?;
    let (title, x_column) = page.chart_title(metric, chart_type);
    log::debug!(
        "recomputing {} chart for page {} ({} rows)",
        chart_type,
        page.key,
        table.len()
    );
    render(&table, x_column, metric, tag, &title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::graph::ChartData;

    fn dataset() -> Dataset {
        let columns = ["Mês", "Operador", "Unidade", "Vendas Realizadas", "Leads Recebidos"];
        let rows = [
            ("Jan", "Ana", "Centro", 10.0, 40.0),
            ("Jan", "Bia", "Norte", 5.0, 22.0),
            ("Fev", "Ana", "Norte", 7.0, 31.0),
            ("Fev", "Ana", "Norte", 1.0, 3.0),
        ];
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|&(m, o, u, v, l)| {
                    vec![m.into(), o.into(), u.into(), CellValue::Number(v), CellValue::Number(l)]
                })
                .collect(),
        )
    }

    #[test]
    fn metric_page_plots_raw_rows() {
        let chart = recompute(&dataset(), &ChartRequest::new("vendas")).unwrap();
        assert_eq!(chart.title, "Vendas Realizadas por Mês");
        assert_eq!(chart.chart_type, ChartType::Bar);
        assert_eq!(chart.point_count(), 4);
    }

    #[test]
    fn metric_page_pie_is_sliced_by_month() {
        let request = ChartRequest::new("vendas").chart_type("pie").metric("Leads Recebidos");
        let chart = recompute(&dataset(), &request).unwrap();
        let names: Vec<&str> = chart.slices().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Jan", "Fev"]);
        assert_eq!(chart.slices()[0].value, 15.0);
    }

    #[test]
    fn analysis_page_defaults_to_first_metric() {
        let chart = recompute(&dataset(), &ChartRequest::new("operador").chart_type("line")).unwrap();
        assert_eq!(chart.title, "Leads Recebidos por Mês e Operador");
        match chart.data {
            ChartData::Cartesian { series, .. } => {
                let ys: Vec<f64> = series[0].points.iter().map(|p| p.y).collect();
                assert_eq!(ys, vec![40.0, 22.0, 34.0]);
            }
            other => panic!("expected cartesian data, got {:?}", other),
        }
    }

    #[test]
    fn analysis_pie_is_sliced_by_dimension() {
        let request = ChartRequest::new("unidade")
            .chart_type("pie")
            .metric("Vendas Realizadas");
        let chart = recompute(&dataset(), &request).unwrap();
        assert_eq!(chart.title, "Vendas Realizadas por Unidade");
        assert_eq!(chart.slices().len(), 2);
        assert_eq!(chart.slices()[1].name, "Norte");
        assert_eq!(chart.slices()[1].value, 13.0);
    }

    #[test]
    fn selection_errors_surface() {
        let ds = dataset();
        assert_eq!(
            recompute(&ds, &ChartRequest::new("relatorio")).unwrap_err(),
            DashboardError::PageNotFound("relatorio".to_string())
        );
        assert_eq!(
            recompute(&ds, &ChartRequest::new("leads").chart_type("donut")).unwrap_err(),
            DashboardError::UnsupportedChartType("donut".to_string())
        );
        assert_eq!(
            recompute(&ds, &ChartRequest::new("meta")).unwrap_err(),
            DashboardError::ColumnNotFound("Meta de Vendas".to_string())
        );
        assert_eq!(
            recompute(&ds, &ChartRequest::new("operador").metric("Insucessos")).unwrap_err(),
            DashboardError::ColumnNotFound("Insucessos".to_string())
        );
    }

    #[test]
    fn analysis_metric_must_come_from_the_selector() {
        let ds = dataset();
        for column in ["Mês", "Operador", "Unidade"] {
            assert_eq!(
                recompute(&ds, &ChartRequest::new("unidade").metric(column)).unwrap_err(),
                DashboardError::UnsupportedMetric(column.to_string())
            );
        }
        // single-metric pages ignore the selection entirely
        assert!(recompute(&ds, &ChartRequest::new("vendas").metric("Mês")).is_ok());
    }
}
