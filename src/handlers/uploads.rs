//! Event image upload. Files land under the configured upload directory
//! and are served back via the /uploads static route.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::auth::current_profile;
use crate::mailer::Mailer;
use crate::models::Role;
use crate::policy;
use crate::state::AppState;
use crate::store::{AuthStore, EntityStore};
use crate::utils::error::AppError;
use crate::utils::response::created;

#[derive(Serialize)]
pub struct UploadedImage {
    pub url: String,
}

/// POST /api/uploads/event-image
pub async fn upload_event_image<E, A, M>(
    State(state): State<Arc<AppState<E, A, M>>>,
    cookies: Cookies,
    mut multipart: Multipart,
) -> Result<Response, AppError>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    let profile = current_profile(&state, &cookies).await?;
    policy::require_role(&profile, &[Role::Seller, Role::Admin])?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
        .ok_or_else(|| AppError::Validation("an image file is required".to_string()))?;

    let extension = field
        .file_name()
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("the uploaded file is empty".to_string()));
    }

    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    let dir = FsPath::new(&state.config.upload_dir).join("event-images");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;
    tokio::fs::write(dir.join(&file_name), &bytes)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    tracing::info!(file = %file_name, size = bytes.len(), "Event image stored");
    let image = UploadedImage {
        url: format!("/uploads/event-images/{file_name}"),
    };
    Ok(created(image, "Image uploaded").into_response())
}
