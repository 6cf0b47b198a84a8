//! Error types for the PDF render service

use crate::renderer::RenderError;
use crate::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use render_cache::CacheError;
use std::fmt;

/// Startup and server-level failures
#[derive(Debug)]
pub enum ServiceError {
    Cache(CacheError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Cache(err) => write!(f, "Cache error: {}", err),
            ServiceError::Io(err) => write!(f, "IO error: {}", err),
            ServiceError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Cache(err) => Some(err),
            ServiceError::Io(err) => Some(err.as_ref()),
            ServiceError::Config(_) => None,
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        ServiceError::Cache(err)
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServiceError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Terminal failure of a single generate request
#[derive(Debug)]
pub enum GenerateError {
    EmptyBody,
    Write(CacheError),
    Render(RenderError),
    ReadBack(CacheError),
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::EmptyBody => StatusCode::BAD_REQUEST,
            GenerateError::Write(_) | GenerateError::Render(_) | GenerateError::ReadBack(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short summary returned in the `error` field
    pub fn summary(&self) -> &'static str {
        match self {
            GenerateError::EmptyBody => "HTML content is required",
            GenerateError::Write(_) => "Failed to write HTML file",
            GenerateError::Render(_) => "Failed to generate PDF",
            GenerateError::ReadBack(_) => "Failed to read PDF file",
        }
    }

    /// Detail returned in the `message` field
    pub fn message(&self) -> String {
        match self {
            GenerateError::EmptyBody => "Request body cannot be empty".to_string(),
            GenerateError::Write(err) | GenerateError::ReadBack(err) => err.to_string(),
            GenerateError::Render(err) => err.to_string(),
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary(), self.message())
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::EmptyBody => None,
            GenerateError::Write(err) | GenerateError::ReadBack(err) => Some(err),
            GenerateError::Render(err) => Some(err),
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.summary().to_string(),
                message: self.message(),
            }),
        )
            .into_response()
    }
}
