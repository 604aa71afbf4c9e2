//! Seller application endpoints: submission, the caller's history, and
//! the admin decision queue

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use super::auth::current_profile;
use crate::mailer::Mailer;
use crate::models::{ApprovalStatus, Decision, Role, SellerApplication, UserProfile};
use crate::policy;
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::workflow::SellerApplicationFields;

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub business_name: String,
    pub business_type: String,
    pub website: Option<String>,
    pub experience: String,
    pub event_types: String,
}

/// POST /api/seller/apply
pub async fn submit_application<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Json(req): Json<ApplyRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let application = state
        .engine
        .submit_seller_application(
            &profile,
            SellerApplicationFields {
                business_name: req.business_name,
                business_type: req.business_type,
                website: req.website,
                experience: req.experience,
                event_types: req.event_types,
            },
        )
        .await?;

    Ok(created(application, "Application submitted").into_response())
}

/// GET /api/seller/applications
///
/// The caller's own application history, newest first.
pub async fn my_applications<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let applications = state.entities.applications_for_user(profile.id).await?;
    Ok(success(applications, "Applications fetched").into_response())
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<ApprovalStatus>,
}

/// GET /api/admin/applications?status=
///
/// Defaults to the pending queue.
pub async fn list_applications<E, A, M>(
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
    let applications = state.engine.applications_by_status(status).await?;
    Ok(success(applications, "Applications fetched").into_response())
}

#[derive(Deserialize)]
pub struct DecisionRequest {
    pub decision: Decision,
}

/// The decided application together with the owner's updated profile, so
/// the admin view can refresh both without a re-query.
#[derive(Serialize)]
pub struct DecisionOutcome {
    pub application: SellerApplication,
    pub user: UserProfile,
}

/// POST /api/admin/applications/:id/decision
pub async fn decide_application<E, A, M>(
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
    let (application, user) = state
        .engine
        .decide_seller_application(&profile, id, req.decision)
        .await?;

    Ok(success(DecisionOutcome { application, user }, "Application decided").into_response())
}

/// POST /api/admin/applications/:id/complete
///
/// Retry the profile side effect after a partial failure.
pub async fn complete_application<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    let user = state.engine.complete_seller_decision(&profile, id).await?;

    Ok(success(user, "User status updated").into_response())
}
