use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::ApprovalStatus;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// A guarded route was hit without a usable session. Rendered as a
    /// silent redirect to the sign-in page, never as an error body.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Authenticated, but the role is not allowed here. Also a silent
    /// redirect, so restricted pages do not reveal their existence.
    #[error("Not authorized")]
    NotAuthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Status change attempted on an entity that is no longer pending.
    /// Terminal states reject re-decision rather than silently accepting it.
    #[error("{entity} {id} is already {status}")]
    InvalidTransition {
        entity: &'static str,
        id: Uuid,
        status: ApprovalStatus,
    },

    /// The entity-status write of a decision succeeded but the dependent
    /// user write failed. The first write is not rolled back; the admin
    /// retries the side effect explicitly.
    #[error("{entity} {id} was marked {status} but the user update failed; retry the role update")]
    PartialFailure {
        entity: &'static str,
        id: Uuid,
        status: ApprovalStatus,
        #[source]
        source: Box<AppError>,
    },

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("External service error: {0}")]
    Provider(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotAuthenticated | AppError::NotAuthorized => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::PartialFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::NotAuthorized => "NOT_AUTHORIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::PartialFailure { .. } => "PARTIAL_FAILURE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Provider(_) => "PROVIDER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            // Redirects are expected traffic, not failures.
            AppError::NotAuthenticated | AppError::NotAuthorized => {
                debug!(error = ?self, "Access denied, redirecting");
            }
            AppError::PartialFailure {
                entity,
                id,
                status,
                source,
            } => {
                error!(
                    entity = entity,
                    id = %id,
                    status = status.as_str(),
                    source = ?source,
                    "Partial failure: decision recorded but user update failed"
                );
            }
            AppError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            _ => {
                error!(error = ?self, "Application error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        // Authorization failures are silent redirects (see variant docs).
        match &self {
            AppError::NotAuthenticated => return Redirect::to("/sign-in").into_response(),
            AppError::NotAuthorized => return Redirect::to("/dashboard").into_response(),
            _ => {}
        }

        let status = self.status_code();
        let code = self.code();

        // Only expose high-level messages to the client.
        let public_message = match &self {
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Provider(_) => "An external service failed".to_string(),
            other => other.to_string(),
        };

        // Transition and partial-failure errors carry enough context for
        // the admin UI to retry against the right entity.
        let details = match &self {
            AppError::InvalidTransition { entity, id, status }
            | AppError::PartialFailure {
                entity, id, status, ..
            } => Some(json!({
                "entity": entity,
                "id": id,
                "status": status.as_str(),
            })),
            _ => None,
        };

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_is_distinct_from_ordinary_errors() {
        let err = AppError::PartialFailure {
            entity: "seller application",
            id: Uuid::new_v4(),
            status: ApprovalStatus::Approved,
            source: Box::new(AppError::Provider("store unavailable".into())),
        };
        assert_eq!(err.code(), "PARTIAL_FAILURE");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("retry the role update"));
    }

    #[test]
    fn invalid_transition_is_a_conflict() {
        let err = AppError::InvalidTransition {
            entity: "event",
            id: Uuid::new_v4(),
            status: ApprovalStatus::Rejected,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("already rejected"));
    }
}
