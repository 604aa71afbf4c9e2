//! Ticket purchase and the caller's ticket wallet

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use super::auth::current_profile;
use crate::mailer::Mailer;
use crate::models::{Event, Ticket};
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub event_id: Uuid,
    pub quantity: i32,
}

/// POST /api/tickets
pub async fn purchase<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Json(req): Json<PurchaseRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let ticket = state
        .engine
        .purchase_ticket(&profile, req.event_id, req.quantity)
        .await?;

    Ok(created(ticket, "Ticket purchased").into_response())
}

#[derive(Serialize)]
pub struct TicketWithEvent {
    pub ticket: Ticket,
    pub event: Event,
}

/// GET /api/tickets
///
/// The caller's tickets joined with their events, newest purchase first.
pub async fn my_tickets<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let tickets: Vec<TicketWithEvent> = state
        .entities
        .tickets_for_user(profile.id)
        .await?
        .into_iter()
        .map(|(ticket, event)| TicketWithEvent { ticket, event })
        .collect();

    Ok(success(tickets, "Tickets fetched").into_response())
}
