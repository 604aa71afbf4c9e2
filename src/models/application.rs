use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ApprovalStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "business_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Individual,
    Company,
    Nonprofit,
}

impl FromStr for BusinessType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(BusinessType::Individual),
            "company" => Ok(BusinessType::Company),
            "nonprofit" => Ok(BusinessType::Nonprofit),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SellerApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub business_type: BusinessType,
    pub website: Option<String>,
    pub experience: String,
    pub event_types: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub business_name: String,
    pub business_type: BusinessType,
    pub website: Option<String>,
    pub experience: String,
    pub event_types: String,
}
