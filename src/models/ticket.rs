use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A ticket purchase. Immutable once created; there is no cancellation or
/// refund flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub total_price: Decimal,
}
