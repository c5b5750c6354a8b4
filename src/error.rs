//! Error types for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::translate::openai_types::ErrorResponse;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Invalid request body: {message}")]
    ClientInput { message: String },

    #[error("Unauthorized")]
    Auth,

    #[error("Method not allowed")]
    Method,

    /// The backend could not be reached at all.
    #[error("Backend transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend answered 2xx but the body did not match the result shape.
    #[error("Failed to decode backend response: {source}. Body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GatewayError {
    pub fn client_input(msg: impl Into<String>) -> Self {
        Self::ClientInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ClientInput { .. } => StatusCode::BAD_REQUEST,
            Self::Auth => StatusCode::UNAUTHORIZED,
            Self::Method => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ClientInput { .. } | Self::Method => "invalid_request_error",
            Self::Auth => "authentication_error",
            Self::Transport(_) | Self::Backend { .. } | Self::Decode { .. } => "api_error",
            _ => "internal_error",
        }
    }

    /// Raw backend body retained for diagnostics, when one was received.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Backend { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::Backend { .. } | Self::Decode { .. } => {
                format!("Workers AI API error: {self}")
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse::new(self.error_type(), self.client_message(), status.as_u16());
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
