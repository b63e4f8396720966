//! Page layouts handed to the browser: sidebar, selectors and placeholder.

use crate::catalog::{
    DEFAULT_CHART_TYPE, METRIC_OPTIONS, Navigation, PAGES, PLACEHOLDER, PageDescriptor,
    default_metric,
};
use crate::graph::ChartType;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
pub struct SidebarEntry {
    pub label: &'static str,
    pub href: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SelectOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// A dropdown with a fixed set of options
#[derive(Serialize, Debug, PartialEq)]
pub struct Selector {
    pub id: &'static str,
    /// Query parameter the selection is sent as
    pub param: &'static str,
    pub options: Vec<SelectOption>,
    pub default: &'static str,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum PageLayout {
    Page {
        key: &'static str,
        title: &'static str,
        /// Only present on analysis pages
        #[serde(skip_serializing_if = "Option::is_none")]
        metric_selector: Option<Selector>,
        chart_type_selector: Selector,
    },
    Placeholder { placeholder: &'static str },
}

impl PageLayout {
    pub fn title(&self) -> &'static str {
        match self {
            PageLayout::Page { title, .. } => *title,
            PageLayout::Placeholder { .. } => "Dashboard",
        }
    }
}

pub fn sidebar() -> Vec<SidebarEntry> {
    PAGES
        .iter()
        .map(|page| SidebarEntry {
            label: page.label,
            href: page.href(),
        })
        .collect()
}

pub fn chart_type_selector() -> Selector {
    Selector {
        id: "chart-type",
        param: "chart_type",
        options: ChartType::ALL
            .iter()
            .map(|t| SelectOption {
                label: t.label(),
                value: t.tag(),
            })
            .collect(),
        default: DEFAULT_CHART_TYPE.tag(),
    }
}

pub fn metric_selector() -> Selector {
    Selector {
        id: "metric",
        param: "metric",
        options: METRIC_OPTIONS
            .iter()
            .map(|&(label, value)| SelectOption { label, value })
            .collect(),
        default: default_metric(),
    }
}

/// Layout of the page a navigation lands on
pub fn page_layout(navigation: Navigation) -> PageLayout {
    match navigation {
        Navigation::NoPageSelected => PageLayout::Placeholder {
            placeholder: PLACEHOLDER,
        },
        Navigation::PageSelected(page) => descriptor_layout(page),
    }
}

fn descriptor_layout(page: &'static PageDescriptor) -> PageLayout {
    PageLayout::Page {
        key: page.key,
        title: page.title,
        metric_selector: page.has_metric_selector().then(metric_selector),
        chart_type_selector: chart_type_selector(),
    }
}
