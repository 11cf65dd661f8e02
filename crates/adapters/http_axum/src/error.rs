//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homechart_domain::error::{HomeChartError, ValidationError};

/// JSON error envelope returned by API endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error_message: String,
}

/// Maps [`HomeChartError`] to an HTTP response.
///
/// | error          | status |
/// |----------------|--------|
/// | `Validation`   | 500, message passed through |
/// | `Unauthorized` | 401    |
/// | `Storage`      | 500, generic message |
#[derive(Debug)]
pub struct ApiError(HomeChartError);

impl From<HomeChartError> for ApiError {
    fn from(err: HomeChartError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HomeChartError::Validation(err) => {
                tracing::debug!(error = %err, "rejected request");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            HomeChartError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
            HomeChartError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            error_message: message,
        };
        (status, Json(body)).into_response()
    }
}
