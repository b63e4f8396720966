use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("failed to load dataset from {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("unsupported chart type: {0}")]
    UnsupportedChartType(String),
    #[error("unsupported metric: {0}")]
    UnsupportedMetric(String),
    #[error("non-numeric value {value:?} in column {column} at row {row}")]
    NonNumericValue {
        column: String,
        row: usize,
        value: String,
    },
    #[error("unknown page: {0}")]
    PageNotFound(String),
    #[error("failed to render chart: {0}")]
    Render(String),
}

impl DashboardError {
    pub fn load(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(feature = "web")]
mod response {
    use super::DashboardError;
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    #[derive(Serialize)]
    struct ErrorBody {
        status: &'static str,
        message: String,
    }

    impl DashboardError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                DashboardError::UnsupportedChartType(_) | DashboardError::UnsupportedMetric(_) => {
                    StatusCode::BAD_REQUEST
                }
                DashboardError::PageNotFound(_) => StatusCode::NOT_FOUND,
                DashboardError::ColumnNotFound(_) | DashboardError::NonNumericValue { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                DashboardError::Load { .. } | DashboardError::Render(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for DashboardError {
        fn into_response(self) -> Response {
            log::warn!("request failed: {}", self);
            let body = ErrorBody {
                status: "error",
                message: self.to_string(),
            };
            (self.status_code(), Json(body)).into_response()
        }
    }
}
