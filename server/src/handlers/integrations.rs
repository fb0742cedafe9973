use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::Value;
use tracing::info;

use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{empty_success, success};

/// Proxies the stadium routes published by ServiceNow.
pub async fn list_routes(State(state): State<AppState>) -> AppResult<Response> {
    let routes = state.servicenow.fetch_routes().await?;
    Ok(success(routes))
}

/// Reserved for pushing ticket state to ServiceNow; only acknowledges today.
pub async fn servicenow_sync(body: Option<Json<Value>>) -> Response {
    let payload = body.map(|Json(value)| value).unwrap_or(Value::Null);
    info!(payload = %payload, "ServiceNow sync requested");
    empty_success("ServiceNow integration placeholder")
}
