use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{health_check, integrations, matches, tickets, users};
use crate::state::AppState;

/// API routes without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route("/matches/:id", get(matches::get_match))
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/tickets", get(tickets::list_user_tickets))
        .route("/routes", get(integrations::list_routes))
        .route("/servicenow/sync", post(integrations::servicenow_sync))
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
