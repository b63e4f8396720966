use crate::aggregate::Dimension;
use crate::dataset::MONTH_COLUMN;
use crate::graph::ChartType;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

/// Message shown when no page matches the location
pub const PLACEHOLDER: &str = "Selecione uma opção na barra lateral.";

/// Heading of the navigation sidebar
pub const SIDEBAR_TITLE: &str = "Navegação";

/// Metrics offered by the analysis pages, as (label, column)
pub const METRIC_OPTIONS: [(&str, &str); 10] = [
    ("Leads Recebidos", "Leads Recebidos"),
    ("Vendas Realizadas", "Vendas Realizadas"),
    ("Atendimentos no Dia", "Atendimentos no Dia"),
    ("Ações Realizadas", "Ações Realizadas"),
    ("Ações Planejadas", "Ações Planejadas"),
    ("Resgates de Clientes", "Resgates de Clientes"),
    ("Pesquisa de Satisfação", "Pesquisa de Satisfação"),
    ("Meta de Vendas", "Meta de Vendas"),
    ("Insucessos", "Insucessos"),
    ("Tempo Médio de Atendimento", "Tempo Médio de Atendimento (min)"),
];

pub const DEFAULT_CHART_TYPE: ChartType = ChartType::Bar;

/// What a page plots
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageKind {
    /// Raw rows of one metric against the month column
    Metric { metric: &'static str },
    /// A selectable metric summed per dimension value and month
    Analysis { dimension: Dimension },
}

/// Static description of one navigable page
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
pub struct PageDescriptor {
    pub key: &'static str,
    /// Sidebar label
    pub label: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub kind: PageKind,
}

impl PageDescriptor {
    const fn metric(
        key: &'static str,
        label: &'static str,
        metric: &'static str,
        title: &'static str,
    ) -> Self {
        PageDescriptor {
            key,
            label,
            title,
            kind: PageKind::Metric { metric },
        }
    }

    const fn analysis(
        key: &'static str,
        label: &'static str,
        dimension: Dimension,
        title: &'static str,
    ) -> Self {
        PageDescriptor {
            key,
            label,
            title,
            kind: PageKind::Analysis { dimension },
        }
    }

    pub fn href(&self) -> String {
        format!("/{}", self.key)
    }

    pub fn x_column(&self) -> &'static str {
        MONTH_COLUMN
    }

    pub fn has_metric_selector(&self) -> bool {
        matches!(self.kind, PageKind::Analysis { .. })
    }

    /// Chart title and category column for a selection on this page
    ///
    /// Single-metric pages keep their fixed title and pass the month column
    /// as the pie category. Analysis pages name the metric and dimension, and
    /// a pie is sliced by the dimension instead of the month.
    pub fn chart_title(&self, metric: &str, chart_type: ChartType) -> (String, &'static str) {
        match (self.kind, chart_type) {
            (PageKind::Metric { .. }, _) => (self.title.to_string(), MONTH_COLUMN),
            (PageKind::Analysis { dimension }, ChartType::Pie) => (
                format!("{} por {}", metric, dimension.column()),
                dimension.column(),
            ),
            (PageKind::Analysis { dimension }, _) => (
                format!("{} por Mês e {}", metric, dimension.column()),
                MONTH_COLUMN,
            ),
        }
    }
}

/// Outcome of looking up a location
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Navigation {
    NoPageSelected,
    PageSelected(&'static PageDescriptor),
}

lazy_static! {
    /// Every page in sidebar order
    pub static ref PAGES: Vec<PageDescriptor> = vec![
        PageDescriptor::metric("leads", "Leads Recebidos", "Leads Recebidos", "Leads Recebidos por Mês"),
        PageDescriptor::metric("vendas", "Vendas Realizadas", "Vendas Realizadas", "Vendas Realizadas por Mês"),
        PageDescriptor::metric(
            "tempo",
            "Tempo Médio de Atendimento",
            "Tempo Médio de Atendimento (min)",
            "Tempo Médio de Atendimento por Mês",
        ),
        PageDescriptor::metric("acoes-realizadas", "Ações Realizadas", "Ações Realizadas", "Ações Realizadas por Mês"),
        PageDescriptor::metric("acoes-planejadas", "Ações Planejadas", "Ações Planejadas", "Ações Planejadas por Mês"),
        PageDescriptor::metric("resgates", "Resgates de Clientes", "Resgates de Clientes", "Resgates de Clientes por Mês"),
        PageDescriptor::metric("pesquisa", "Pesquisa de Satisfação", "Pesquisa de Satisfação", "Pesquisa de Satisfação por Mês"),
        PageDescriptor::metric("meta", "Meta de Vendas", "Meta de Vendas", "Meta de Vendas por Mês"),
        PageDescriptor::metric("insucessos", "Insucessos", "Insucessos", "Insucessos por Mês"),
        PageDescriptor::analysis("operador", "Operador", Dimension::Operator, "Análise por Operador"),
        PageDescriptor::analysis("unidade", "Unidade", Dimension::Unit, "Análise por Unidade"),
    ];
    static ref BY_KEY: HashMap<&'static str, usize> =
        PAGES.iter().enumerate().map(|(idx, page)| (page.key, idx)).collect();
}

pub fn page(key: &str) -> Option<&'static PageDescriptor> {
    BY_KEY.get(key).map(|&idx| &PAGES[idx])
}

/// Maps a location path such as `/vendas` to its page
pub fn resolve(path: &str) -> Navigation {
    let key = path.trim().trim_matches('/');
    match page(key) {
        Some(descriptor) => Navigation::PageSelected(descriptor),
        None => Navigation::NoPageSelected,
    }
}

pub fn default_metric() -> &'static str {
    METRIC_OPTIONS[0].1
}

/// Whether `column` is one of the metrics an analysis page can select
pub fn is_metric_option(column: &str) -> bool {
    METRIC_OPTIONS.iter().any(|&(_, value)| value == column)
}
