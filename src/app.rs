use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::header,
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::catalog::{self, Navigation, SIDEBAR_TITLE};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::draw;
use crate::error::DashboardError;
use crate::graph::Chart;
use crate::layout::{PageLayout, Selector, page_layout, sidebar};
use crate::loader;
use crate::pipeline::{ChartRequest, recompute};

/// Shared, read-only state of the server
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
    chart_size: (u32, u32),
}

impl AppState {
    pub fn new(dataset: Dataset, config: &DashboardConfig) -> Self {
        AppState {
            dataset: Arc::new(dataset),
            chart_size: (config.chart_width, config.chart_height),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_home))
        .route("/:page", get(serve_page))
        .route("/api/pages/:page", get(get_page_layout))
        .route("/api/chart/:page", get(get_chart))
        .route("/png/:page", get(get_chart_png))
        .fallback(serve_home)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    // A dataset that cannot be loaded aborts start-up
    let dataset = loader::load_dataset(&config.data_file)?;
    let app = router(AppState::new(dataset, &config));

    let listener = TcpListener::bind(config.bind_addr).await?;
    log::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    log::debug!("{} {} -> {}", method, uri, response.status());
    response
}

async fn serve_home() -> Html<String> {
    Html(render_shell(Navigation::NoPageSelected))
}

async fn serve_page(Path(page): Path<String>) -> Html<String> {
    Html(render_shell(catalog::resolve(&page)))
}

async fn get_page_layout(Path(page): Path<String>) -> Json<PageLayout> {
    Json(page_layout(catalog::resolve(&page)))
}

async fn get_chart(
    Path(page): Path<String>,
    Query(query): Query<ChartRequest>,
    State(state): State<AppState>,
) -> Result<Json<Chart>, DashboardError> {
    let request = ChartRequest { page, ..query };
    recompute(&state.dataset, &request).map(Json)
}

async fn get_chart_png(
    Path(page): Path<String>,
    Query(query): Query<ChartRequest>,
    State(state): State<AppState>,
) -> Result<Response, DashboardError> {
    let request = ChartRequest { page, ..query };
    let chart = recompute(&state.dataset, &request)?;
    let (width, height) = state.chart_size;
    let png = tokio::task::spawn_blocking(move || draw::draw_png(&chart, width, height))
        .await
        .map_err(|e| DashboardError::Render(e.to_string()))??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Fills the page template with the sidebar and the page content
///
/// The layout is also injected as `PAGE` so the page script knows which
/// chart endpoint to call when a selector changes.
fn render_shell(navigation: Navigation) -> String {
    let layout = page_layout(navigation);

    let sidebar_items = sidebar()
        .iter()
        .map(|entry| {
            format!(
                "            <li><a href=\"{}\">{}</a></li>",
                entry.href, entry.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let layout_json = serde_json::to_string(&layout).unwrap_or_else(|_| "{}".to_string());

    include_str!("./static/dashboard.html")
        .replace("{{TITLE}}", layout.title())
        .replace("{{SIDEBAR_TITLE}}", SIDEBAR_TITLE)
        .replace("{{SIDEBAR}}", &sidebar_items)
        .replace("{{CONTENT}}", &render_content(&layout))
        .replace(
            "</head>",
            &format!("    <script>const PAGE = {};</script>\n</head>", layout_json),
        )
}

fn render_content(layout: &PageLayout) -> String {
    match layout {
        PageLayout::Placeholder { placeholder } => format!("        <h3>{}</h3>", placeholder),
        PageLayout::Page {
            key,
            title,
            metric_selector,
            chart_type_selector,
        } => {
            let mut html = format!("        <h3>{}</h3>\n", title);
            let mut params = Vec::new();
            for selector in metric_selector.iter().chain([chart_type_selector]) {
                html.push_str(&render_select(selector));
                params.push(format!(
                    "{}={}",
                    selector.param,
                    urlencoding::encode(selector.default)
                ));
            }
            html.push_str("        <p id=\"chart-error\" class=\"chart-error\" hidden></p>\n");
            html.push_str(&format!(
                "        <img id=\"chart\" class=\"chart\" src=\"/png/{}?{}\" alt=\"{}\" onerror=\"this.hidden = true\">",
                key,
                params.join("&amp;"),
                title
            ));
            html
        }
    }
}

fn render_select(selector: &Selector) -> String {
    let options = selector
        .options
        .iter()
        .map(|option| {
            let selected = if option.value == selector.default {
                " selected"
            } else {
                ""
            };
            format!(
                "            <option value=\"{}\"{}>{}</option>",
                option.value, selected, option.label
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "        <select id=\"{}\" data-param=\"{}\">\n{}\n        </select>\n",
        selector.id, selector.param, options
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PLACEHOLDER;

    #[test]
    fn shell_shows_placeholder_for_unknown_pages() {
        let html = render_shell(catalog::resolve("/desconhecida"));
        assert!(html.contains(PLACEHOLDER));
        assert!(html.contains("<a href=\"/unidade\">Unidade</a>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn analysis_shell_has_both_selectors() {
        let html = render_shell(catalog::resolve("/operador"));
        assert!(html.contains("<h3>Análise por Operador</h3>"));
        assert!(html.contains("data-param=\"metric\""));
        assert!(html.contains("data-param=\"chart_type\""));
        assert!(html.contains(
            "src=\"/png/operador?metric=Leads%20Recebidos&amp;chart_type=bar\""
        ));
        assert!(html.contains("const PAGE = {\"key\":\"operador\""));
    }

    #[test]
    fn metric_shell_has_chart_type_selector_only() {
        let html = render_shell(catalog::resolve("/leads"));
        assert!(!html.contains("data-param=\"metric\""));
        assert!(html.contains("<option value=\"bar\" selected>Gráfico de Barras</option>"));
    }
}
