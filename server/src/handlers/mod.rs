use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod integrations;
pub mod matches;
pub mod tickets;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "matchday-api",
    };

    success(payload)
}
