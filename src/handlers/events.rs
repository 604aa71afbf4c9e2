//! Event endpoints: public listings, seller submissions, and the admin
//! review queue

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::applications::{DecisionRequest, StatusQuery};
use super::auth::current_profile;
use crate::mailer::Mailer;
use crate::models::{ApprovalStatus, Role};
use crate::policy;
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::workflow::EventRequestFields;

/// GET /api/events
///
/// Public listing: approved events only, soonest first.
pub async fn list_public<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let events = state.entities.approved_events().await?;
    Ok(success(events, "Events fetched").into_response())
}

/// GET /api/events/:id
///
/// Anything that is not approved reads as not found, so pending and
/// rejected events stay invisible.
pub async fn event_detail<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let event = state
        .entities
        .event(id)
        .await?
        .filter(|e| e.status == ApprovalStatus::Approved)
        .ok_or_else(|| AppError::NotFound(format!("event {id}")))?;

    Ok(success(event, "Event fetched").into_response())
}

#[derive(Deserialize)]
pub struct EventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    pub capacity: String,
    pub category: String,
    pub image_url: Option<String>,
}

/// POST /api/events
pub async fn submit_event<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Json(req): Json<EventRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let event = state
        .engine
        .submit_event_request(
            &profile,
            EventRequestFields {
                title: req.title,
                description: req.description,
                date: req.date,
                time: req.time,
                location: req.location,
                price: req.price,
                capacity: req.capacity,
                category: req.category,
                image_url: req.image_url,
            },
        )
        .await?;

    Ok(created(event, "Event submitted for approval").into_response())
}

/// GET /api/seller/events
///
/// The organizer's own events, any status, newest first.
pub async fn my_events<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    policy::require_role(&profile, &[Role::Seller, Role::Admin])?;

    let events = state.entities.events_for_organizer(profile.id).await?;
    Ok(success(events, "Events fetched").into_response())
}

/// GET /api/admin/events?status=
pub async fn list_admin_events<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Query(query): Query<StatusQuery>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    policy::require_role(&profile, &[Role::Admin])?;

    let status = query.status.unwrap_or(ApprovalStatus::Pending);
    let events = state.engine.events_by_status(status).await?;
    Ok(success(events, "Events fetched").into_response())
}

/// POST /api/admin/events/:id/decision
pub async fn decide_event<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let event = state
        .engine
        .decide_event_request(&profile, id, req.decision)
        .await?;

    Ok(success(event, "Event decided").into_response())
}
