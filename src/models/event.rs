use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ApprovalStatus;

/// An event submitted by an organizer. Only `approved` events appear in
/// public listings and can be purchased; `reviewed_by`/`reviewed_at` are
/// set when an admin decides the request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: Decimal,
    pub capacity: i32,
    pub category: String,
    pub image_url: Option<String>,
    pub organizer_id: Uuid,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: Decimal,
    pub capacity: i32,
    pub category: String,
    pub image_url: Option<String>,
    pub organizer_id: Uuid,
}
