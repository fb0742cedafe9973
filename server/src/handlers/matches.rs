use axum::extract::{Path, State};
use axum::response::Response;
use tracing::{info, instrument};

use crate::models::CreateMatchRequest;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::parse_id;
use crate::utils::response::{created, success};
use crate::utils::validation::ValidatedJson;

#[instrument(skip(state))]
pub async fn list_matches(State(state): State<AppState>) -> AppResult<Response> {
    let matches = state.storage.get_matches().await?;
    Ok(success(matches))
}

#[instrument(skip(state))]
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let found = match parse_id(&id) {
        Some(id) => state.storage.get_match(id).await?,
        None => None,
    };

    found
        .map(success)
        .ok_or_else(|| AppError::NotFound("Match not found".to_string()))
}

#[instrument(skip_all)]
pub async fn create_match(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateMatchRequest>,
) -> AppResult<Response> {
    let created_match = state.storage.create_match(payload).await?;
    info!(match_id = %created_match.id, "Match created");
    Ok(created(created_match))
}
