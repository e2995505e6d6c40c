use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Why a call to Keynua failed. Only ever logged and chained as a source;
/// callers see a [`GatewayError`].
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Transport { status, .. } => *status,
            UpstreamError::Unexpected(_) => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            body: None,
            source: Some(err),
        }
    }
}

/// Opaque failure returned by the contract gateway. Displays only a fixed,
/// caller-safe message.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct GatewayError {
    message: &'static str,
    #[source]
    source: UpstreamError,
}

impl GatewayError {
    pub fn new(message: &'static str, source: UpstreamError) -> Self {
        Self { message, source }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: Value,
    pub error: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();

        let (status, message) = match &self {
            AppError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Value::from(violations.clone()),
            ),
            AppError::Gateway(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Value::from(err.message()),
            ),
        };

        let body = ErrorResponse {
            status_code: status.as_u16(),
            message,
            error: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            timestamp: Utc::now(),
            request_id: request_id.clone(),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, request_id = %request_id, "Request failed");
        } else {
            tracing::debug!(error = %self, request_id = %request_id, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn transport_failure() -> UpstreamError {
        UpstreamError::Transport {
            status: Some(400),
            message: "Request failed with status code 400".to_string(),
            body: Some(serde_json::json!({ "error": "invalid templateId" })),
            source: None,
        }
    }

    #[test]
    fn gateway_error_hides_upstream_detail() {
        let err = GatewayError::new("Error creating contract in Keynua", transport_failure());

        assert_eq!(err.to_string(), "Error creating contract in Keynua");
        assert!(!err.to_string().contains("invalid templateId"));

        let cause = err.source().expect("cause is chained");
        assert_eq!(cause.to_string(), "Request failed with status code 400");
    }

    #[test]
    fn unexpected_errors_have_no_status() {
        let err = UpstreamError::from(anyhow::anyhow!("missing field `id`"));
        assert_eq!(err.status(), None);
        assert_eq!(transport_failure().status(), Some(400));
    }

    #[test]
    fn renders_status_codes() {
        let response = AppError::Validation(vec!["title should not be empty".into()]).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let gateway = GatewayError::new("Error finding contract in Keynua", transport_failure());
        let response = AppError::from(gateway).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
