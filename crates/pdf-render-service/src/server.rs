//! HTTP server for the render endpoints
//!
//! Provides POST /api/v1/generate and GET /health.

use crate::error::GenerateError;
use crate::options::RenderOptions;
use crate::render::RenderService;
use crate::types::{HealthResponse, UnhealthyResponse, SERVICE_NAME};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP server
pub struct ServerState {
    pub renderer: RenderService,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(renderer: RenderService) -> Self {
        Self {
            renderer,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/generate", post(generate))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn start_server<F>(
    state: SharedState,
    port: u16,
    max_body_bytes: usize,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state, max_body_bytes);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Render the request body to PDF
async fn generate(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, GenerateError> {
    let options = RenderOptions::from_query(&query);
    let pdf = state.renderer.render(&body, &options).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}.pdf", pdf.key),
            ),
            (
                HeaderName::from_static("x-generated-at"),
                rfc3339(pdf.generated_at),
            ),
        ],
        pdf.data,
    )
        .into_response())
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Response {
    match state.renderer.runner().version().await {
        Ok(version) => {
            let cached_files = state.renderer.registry().len().await;
            (
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy",
                    service: SERVICE_NAME,
                    wkhtmltopdf: version,
                    cached_files,
                    uptime_secs: (Utc::now() - state.started_at).num_seconds().max(0) as u64,
                    timestamp: rfc3339(Utc::now()),
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Renderer version probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy",
                    message: "wkhtmltopdf is not available".to_string(),
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
