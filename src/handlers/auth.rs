//! Authentication endpoints and session helpers

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use crate::crypto::{generate_code, generate_secret, hash_password, verify_password};
use crate::mailer::Mailer;
use crate::models::{NewProfile, PendingReset, UserProfile};
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

const SESSION_COOKIE: &str = "topcity_session";

/// Same limits as the account forms enforce client-side.
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 80;

/// Resolve the caller's profile from the session cookie. The profile is
/// auto-provisioned (role=user, seller_status=none) on the first
/// authenticated request that finds no profile row.
pub async fn current_profile<E, A, M>(
    state: &AppState<E, A, M>,
    cookies: &Cookies,
) -> Result<UserProfile, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let session = match cookies.get(SESSION_COOKIE) {
        Some(cookie) => state.auth.session(cookie.value()).await?,
        None => None,
    };
    let session = session.ok_or(AppError::NotAuthenticated)?;
    let account = state
        .auth
        .account(session.account_id)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    match state.entities.profile(account.id).await? {
        Some(profile) => Ok(profile),
        None => {
            tracing::info!(account_id = %account.id, "No profile found, provisioning one");
            state
                .entities
                .create_profile(NewProfile {
                    id: account.id,
                    email: account.email.clone(),
                    full_name: account.full_name.clone(),
                })
                .await
        }
    }
}

fn set_session_cookie(cookies: &Cookies, session_id: &str) {
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookies.add(cookie);
}

fn clear_session_cookie(cookies: &Cookies) {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(tower_cookies::cookie::time::Duration::ZERO)
        .build();
    cookies.add(cookie);
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// POST /api/auth/sign-up
///
/// Creates an unconfirmed account and mails a confirmation token.
pub async fn sign_up<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    Json(req): Json<SignUpRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email address is required".to_string()));
    }
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let confirm_token = generate_secret();
    let account = state
        .auth
        .create_account(
            &email,
            &password_hash,
            req.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()),
            &confirm_token,
        )
        .await?;

    state
        .mailer
        .send_confirmation(&account.email, &confirm_token)
        .map_err(AppError::Provider)?;

    tracing::info!(account_id = %account.id, "Account staged, confirmation mail sent");
    Ok(empty_success("Check your email to confirm your account").into_response())
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub token: String,
}

/// POST /api/auth/confirm
pub async fn confirm<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    state
        .auth
        .confirm_account(&req.token)
        .await?
        .ok_or_else(|| AppError::Auth("invalid or expired confirmation token".to_string()))?;

    Ok(empty_success("Account confirmed, you can sign in now").into_response())
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/sign-in
pub async fn sign_in<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    Json(req): Json<SignInRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let account = state
        .auth
        .account_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::Auth("invalid credentials".to_string()))?;

    if !verify_password(&req.password, &account.password_hash)? {
        return Err(AppError::Auth("invalid credentials".to_string()));
    }
    if !account.confirmed {
        return Err(AppError::Auth("email not confirmed".to_string()));
    }

    let session = state.auth.create_session(account.id).await?;
    set_session_cookie(&cookies, &session.id);

    // First sign-in provisions the profile row.
    let profile = current_profile(&state, &cookies).await?;
    Ok(success(profile, "Signed in").into_response())
}

/// POST /api/auth/sign-out
pub async fn sign_out<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        state.auth.delete_session(cookie.value()).await?;
    }
    clear_session_cookie(&cookies);

    Ok(empty_success("Signed out").into_response())
}

#[derive(Serialize)]
pub struct SessionContext {
    pub authenticated: bool,
    pub profile: Option<UserProfile>,
}

/// GET /api/auth/session
///
/// The per-request source of authentication truth for the front end.
pub async fn session_context<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let context = match current_profile(&state, &cookies).await {
        Ok(profile) => SessionContext {
            authenticated: true,
            profile: Some(profile),
        },
        Err(AppError::NotAuthenticated) => SessionContext {
            authenticated: false,
            profile: None,
        },
        Err(e) => return Err(e),
    };

    Ok(success(context, "Session context").into_response())
}

#[derive(Deserialize)]
pub struct StageResetRequest {
    pub email: String,
}

/// POST /api/auth/reset
///
/// Initiate a password reset by mailing a one-time token.
pub async fn stage_reset<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    Json(req): Json<StageResetRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let account = state
        .auth
        .account_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("no account with this email".to_string()))?;

    let token = generate_code();
    state
        .auth
        .create_reset(PendingReset {
            token: token.clone(),
            account_id: account.id,
            created_at: Utc::now(),
        })
        .await?;
    state
        .mailer
        .send_password_reset(&account.email, &token)
        .map_err(AppError::Provider)?;

    Ok(empty_success("Password reset mail sent").into_response())
}

#[derive(Deserialize)]
pub struct CompleteResetRequest {
    pub token: String,
    pub password: String,
}

/// POST /api/auth/complete-reset
pub async fn complete_reset<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    Json(req): Json<CompleteResetRequest>,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    validate_password(&req.password)?;

    let reset = state
        .auth
        .take_reset(&req.token)
        .await?
        .ok_or_else(|| AppError::Auth("invalid or expired reset token".to_string()))?;

    let password_hash = hash_password(&req.password)?;
    state
        .auth
        .update_password(reset.account_id, &password_hash)
        .await?;

    Ok(empty_success("Password updated, sign in with the new password").into_response())
}
