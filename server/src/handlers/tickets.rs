use axum::extract::{Path, State};
use axum::response::Response;
use tracing::{info, instrument};

use crate::models::{PurchaseTicketRequest, Ticket};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::parse_id;
use crate::utils::response::{created, success};
use crate::utils::validation::{violations_to_value, FieldViolation, ValidatedJson};

#[instrument(skip(state))]
pub async fn list_user_tickets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Response> {
    let tickets: Vec<Ticket> = match parse_id(&user_id) {
        Some(user_id) => state.storage.get_user_tickets(user_id).await?,
        None => Vec::new(),
    };
    Ok(success(tickets))
}

#[instrument(skip(state))]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let found = match parse_id(&id) {
        Some(id) => state.storage.get_ticket(id).await?,
        None => None,
    };

    found
        .map(success)
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))
}

#[instrument(skip_all)]
pub async fn create_ticket(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PurchaseTicketRequest>,
) -> AppResult<Response> {
    // The store does not check references, so it happens here.
    let mut dangling = Vec::new();
    if state.storage.get_user(payload.user_id).await?.is_none() {
        dangling.push(FieldViolation::new(
            "userId",
            "not_found",
            "user does not exist",
        ));
    }
    if state.storage.get_match(payload.match_id).await?.is_none() {
        dangling.push(FieldViolation::new(
            "matchId",
            "not_found",
            "match does not exist",
        ));
    }
    if !dangling.is_empty() {
        return Err(AppError::validation(
            "Invalid ticket data",
            violations_to_value(&dangling),
        ));
    }

    let ticket = state.storage.create_ticket(payload).await?;
    info!(ticket_id = %ticket.id, user_id = %ticket.user_id, "Ticket issued");
    Ok(created(ticket))
}
