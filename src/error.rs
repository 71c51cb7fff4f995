//! Error types and handling for the `WeatherWise` service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the `WeatherWise` service
#[derive(Error, Debug)]
pub enum WeatherWiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request validation errors
    #[error("{message}")]
    Validation { message: String },

    /// Weather provider errors (network, status, malformed payload)
    #[error("{message}")]
    Weather { message: String },

    /// LLM provider errors. Recovered per day, never surfaced to callers.
    #[error("LLM error: {message}")]
    Llm { message: String },

    /// Request body over the accepted size
    #[error("{message}")]
    PayloadTooLarge { message: String },
}

impl WeatherWiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new weather provider error
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::Weather {
            message: message.into(),
        }
    }

    /// Create a new LLM provider error
    pub fn llm<S: Into<String>>(message: S) -> Self {
        Self::Llm {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherWiseError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeatherWiseError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Request URLs can carry API keys, so they never reach the message
impl From<reqwest_middleware::Error> for WeatherWiseError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::weather(e.without_url().to_string()),
            reqwest_middleware::Error::Middleware(e) => {
                Self::weather(format!("Weather request failed: {}", e.root_cause()))
            }
        }
    }
}

impl IntoResponse for WeatherWiseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
