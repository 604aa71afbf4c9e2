pub mod applications;
pub mod auth;
pub mod events;
pub mod stats;
pub mod tickets;
pub mod uploads;

use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::success;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "topcity-api",
    };

    success(payload, "Health check successful").into_response()
}
