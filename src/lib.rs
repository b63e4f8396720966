/*!
# Sales Dashboard

A browser-based dashboard for monthly sales and operations metrics, built in Rust.

## Overview

The dashboard reads a spreadsheet of monthly metrics once at start-up and serves
a set of pages, one per metric plus two analysis pages that break any metric
down by operator or by business unit. Every page lets the user switch between
bar, line, area and pie charts; the chart is recomputed on every change.

## Architecture

### Chart Pipeline
- **Dataset Store** - Immutable table loaded from xlsx/xls/ods/csv
- **Aggregator** - Sums a metric per (dimension value, month)
- **Chart Renderer** - Turns a table into a bar, line, area or pie chart
- **Page Catalog** - Fixed table of navigable pages and their selectors

### Web Layer
- **Technologies**: Rust, axum, plotters
- Page shell with sidebar navigation
- JSON chart endpoint used by the page script on selector changes
- PNG endpoint drawing the chart with plotters

## Modules

- **cell**: Scalar cell values
- **dataset**: The in-memory table
- **loader**: Spreadsheet and CSV input
- **aggregate**: Grouping and summation
- **graph**: Chart types and the chart renderer
- **draw**: PNG rasterisation of charts
- **catalog**: Pages, metrics and navigation
- **layout**: Sidebar and selector layouts
- **pipeline**: Selection-to-chart recomputation
- **config**: Start-up settings
- **app**: Routing and middleware

## REST API Endpoints

- `/{page}` - Page shell, or the placeholder for unknown pages
- `/api/pages/{page}` - Page layout as JSON
- `/api/chart/{page}?chart_type=&metric=` - Chart as JSON
- `/png/{page}?chart_type=&metric=` - Chart as PNG
*/

pub mod aggregate;
pub mod catalog;
pub mod cell;
pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod pipeline;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod draw;

/// Re-export the pipeline entry points
pub use aggregate::{Dimension, aggregate};
pub use dataset::Dataset;
pub use error::{DashboardError, DashboardResult};
pub use graph::{Chart, ChartType, render};
pub use pipeline::{ChartRequest, recompute};
