use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use askama::Template;
use serde_json::json;
use thiserror::Error;
use crate::templates::ErrorTemplate;

fn status_for(error: &ns_core::Error) -> StatusCode {
    if error.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Failure of a JSON endpoint, rendered as `{"error": {"code", "message"}}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] ns_core::Error),

    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection.status() {
            StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::InvalidRequest {
            status,
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => status_for(error),
            ApiError::InvalidRequest { status, .. } => *status,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Core(error) => error.code(),
            ApiError::InvalidRequest { .. } => "invalid_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}: {}", self.code(), self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Failure of an HTML page, rendered with the error template.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct PageError(#[from] pub ns_core::Error);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        tracing::error!("❌ {}: {}", self.0.code(), self.0);
        let page = ErrorTemplate {
            status: status.as_u16(),
            code: self.0.code(),
            message: self.0.to_string(),
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, self.0.code().to_string()).into_response()
            }
        }
    }
}
