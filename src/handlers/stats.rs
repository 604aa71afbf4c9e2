//! Dashboard stat widgets, one aggregate payload per role

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tower_cookies::Cookies;

use super::auth::current_profile;
use crate::mailer::Mailer;
use crate::models::{ApprovalStatus, Role};
use crate::policy;
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_events: i64,
    pub pending_applications: i64,
    pub pending_events: i64,
}

/// GET /api/stats/admin
pub async fn admin_stats<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    policy::require_role(&profile, &[Role::Admin])?;

    let stats = AdminStats {
        total_users: state.entities.count_profiles().await?,
        total_events: state.entities.count_events(ApprovalStatus::Approved).await?,
        pending_applications: state
            .entities
            .count_applications(ApprovalStatus::Pending)
            .await?,
        pending_events: state.entities.count_events(ApprovalStatus::Pending).await?,
    };

    Ok(success(stats, "Admin stats fetched").into_response())
}

#[derive(Serialize)]
pub struct SellerStats {
    pub active_events: i64,
    pub pending_events: i64,
    pub total_tickets_sold: i64,
    pub total_revenue: Decimal,
}

/// GET /api/stats/seller
pub async fn seller_stats<E, A, M>(
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
    let active_events = events
        .iter()
        .filter(|e| e.status == ApprovalStatus::Approved)
        .count() as i64;
    let pending_events = events
        .iter()
        .filter(|e| e.status == ApprovalStatus::Pending)
        .count() as i64;

    let event_ids: Vec<_> = events.iter().map(|e| e.id).collect();
    let tickets = state.entities.tickets_for_events(&event_ids).await?;
    let total_tickets_sold = tickets.iter().map(|t| t.quantity as i64).sum();
    let total_revenue = tickets.iter().map(|t| t.total_price).sum();

    let stats = SellerStats {
        active_events,
        pending_events,
        total_tickets_sold,
        total_revenue,
    };

    Ok(success(stats, "Seller stats fetched").into_response())
}

#[derive(Serialize)]
pub struct UserStats {
    pub tickets_purchased: i64,
    pub upcoming_events: i64,
    pub total_spent: Decimal,
}

/// GET /api/stats/user
pub async fn user_stats<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;

    let tickets_purchased = state.entities.count_tickets_for_user(profile.id).await?;
    let holdings = state.entities.tickets_for_user(profile.id).await?;

    let today = Utc::now().date_naive();
    let upcoming_events = holdings
        .iter()
        .filter(|(_, event)| event.date >= today)
        .count() as i64;
    let total_spent = holdings.iter().map(|(ticket, _)| ticket.total_price).sum();

    let stats = UserStats {
        tickets_purchased,
        upcoming_events,
        total_spent,
    };

    Ok(success(stats, "User stats fetched").into_response())
}
