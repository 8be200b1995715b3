// Error types for the vision relay

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream answered with a non-success status. `body` is relayed verbatim.
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16, body: Value },

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::Upstream(_) | ProxyError::Timeout(_) | ProxyError::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Convert ProxyError to HTTP responses for Axum
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_type = match &self {
            ProxyError::UpstreamStatus { body, .. } => {
                return (status, axum::Json(body.clone())).into_response();
            }
            ProxyError::InvalidRequest(_) => "invalid_request_error",
            ProxyError::Upstream(_) | ProxyError::Timeout(_) | ProxyError::Http(_) => {
                "upstream_error"
            }
            ProxyError::Config(_) | ProxyError::ConfigParsing(_) => "configuration_error",
            _ => "internal_error",
        };

        let body = json!({
            "error": {
                "message": self.to_string(),
                "type": error_type,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
