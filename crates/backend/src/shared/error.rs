use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::ApiEnvelope;
use thiserror::Error;

/// Errors surfaced by dashboard endpoints as `{"success": false, "error": ...}`
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Malformed or missing request parameters
    #[error("{0}")]
    Validation(String),

    /// Warehouse or other upstream failure
    #[error("{0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        DashboardError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        match &self {
            DashboardError::Validation(_) => tracing::warn!("Rejected request: {}", message),
            DashboardError::Upstream(_) => tracing::error!("Upstream failure: {}", message),
        }
        (status, Json(ApiEnvelope::<()>::failure(message))).into_response()
    }
}

pub type DashboardResult<T> = Result<Json<ApiEnvelope<T>>, DashboardError>;

/// Unwrap a JSON body, turning extractor rejections (bad JSON, wrong types,
/// unknown fields) into a 400 envelope instead of axum's plain-text reply
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, DashboardError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(DashboardError::Validation(rejection.body_text())),
    }
}
