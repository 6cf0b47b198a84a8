//! Response bodies for the PDF render service

use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "pdf-render-service";

/// JSON body of a failed generate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Health check response when the renderer answers its version probe
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub wkhtmltopdf: String,
    pub cached_files: usize,
    pub uptime_secs: u64,
    pub timestamp: String,
}

/// Health check response when the renderer is unavailable
#[derive(Debug, Serialize)]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub message: String,
    pub error: String,
}
