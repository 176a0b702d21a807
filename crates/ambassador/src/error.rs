use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::waitlist::{RepositoryError, WaitlistServiceError};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Waitlist(WaitlistServiceError),
    /// Body or query string the extractors could not accept.
    Request { status: StatusCode, message: String },
}

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Waitlist(err) => match err {
                WaitlistServiceError::Intake(_) | WaitlistServiceError::InvalidPoints(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                WaitlistServiceError::DuplicateEmail(_)
                | WaitlistServiceError::Repository(RepositoryError::Conflict) => {
                    StatusCode::CONFLICT
                }
                WaitlistServiceError::Repository(RepositoryError::NotFound) => {
                    StatusCode::NOT_FOUND
                }
                WaitlistServiceError::Repository(RepositoryError::Unavailable(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Request { status, .. } => *status,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Waitlist(err) => write!(f, "{}", err),
            AppError::Request { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Waitlist(err) => Some(err),
            AppError::Request { .. } => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<WaitlistServiceError> for AppError {
    fn from(value: WaitlistServiceError) -> Self {
        Self::Waitlist(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::Request {
            status: value.status(),
            message: value.body_text(),
        }
    }
}
