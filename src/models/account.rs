use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Credentials held by the auth provider. The account id doubles as the
/// profile id, so provisioning a profile never needs a join table.
/// Never serialized to clients.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub confirmed: bool,
    pub confirm_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A staged password reset, consumed by the completion endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct PendingReset {
    pub token: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}
