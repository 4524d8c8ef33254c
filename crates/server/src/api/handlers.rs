use super::ApiResult;
use crate::config::AppState;
use atlasgate_core::{ToolError, ToolSpec};
use atlasgate_mcp::{InvokeRequest, InvokeResponse};
use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Liveness only; the backend is never contacted.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend_target: state.dispatcher.context().base_url.clone(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend_target: String,
}

/// List all registered tools in registration order
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolSpec>> {
    Json(state.dispatcher.tools().to_vec())
}

/// Invoke a tool by name
///
/// The body is parsed as JSON whatever the declared content type.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    payload: Bytes,
) -> ApiResult<Json<InvokeResponse>> {
    let body: Value = serde_json::from_slice(&payload).map_err(|err| {
        ToolError::validation(format!("Malformed invoke request: {}", err))
    })?;

    let request = InvokeRequest::from_value(body)?;
    let result = state
        .dispatcher
        .dispatch(&request.name, &request.parameters)
        .await?;

    Ok(Json(InvokeResponse { result }))
}
