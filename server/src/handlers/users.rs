use axum::extract::{Path, State};
use axum::response::Response;
use tracing::{info, instrument};

use crate::models::{PublicUser, SignupRequest};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::parse_id;
use crate::utils::response::{created, success};
use crate::utils::validation::ValidatedJson;

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let found = match parse_id(&id) {
        Some(id) => state.storage.get_user(id).await?,
        None => None,
    };

    found
        .map(|user| success(PublicUser::from(user)))
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// skip_all: the payload carries the password.
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Response> {
    let user = state.storage.create_user(payload).await?;
    info!(user_id = %user.id, "User registered");
    Ok(created(PublicUser::from(user)))
}
