use crate::config::{AppState, ServerConfig};
use anyhow::{Context, Result};
use atlasgate_core::ToolError;
use atlasgate_mcp::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    tracing::info!(
        backend = %state.dispatcher.context().base_url,
        tools = state.dispatcher.tools().len(),
        timeout_ms = state.dispatcher.timeout().as_millis() as u64,
        "Dispatcher ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/mcp/v1/tools", get(handlers::list_tools))
        .route("/mcp/v1/invoke", post(handlers::invoke))
        // Middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false))
                .on_response(DefaultOnResponse::new().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Tool failures rendered as `{"error": {"kind", "message"}}` with the
/// kind's status code.
#[derive(Debug)]
pub struct ApiError(ToolError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.kind.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorBody::from(self.0))).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        Self(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
