//! Postgres store implementations over sqlx

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AuthStore, EntityStore, StoreResult};
use crate::crypto::generate_secret;
use crate::models::{
    Account, ApprovalStatus, Event, NewApplication, NewEvent, NewProfile, NewTicket, PendingReset,
    SellerApplication, SellerStatus, Session, Ticket, UserProfile,
};
use crate::utils::error::AppError;

#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
}

impl PgEntityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().map(|db| db.kind()),
        Some(sqlx::error::ErrorKind::UniqueViolation)
    )
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn create_profile(&self, new: NewProfile) -> StoreResult<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO users (id, email, full_name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(new.id)
        .bind(&new.email)
        .bind(&new.full_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn profile(&self, id: Uuid) -> StoreResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn set_seller_status(
        &self,
        id: Uuid,
        status: SellerStatus,
    ) -> StoreResult<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "UPDATE users SET seller_status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        profile.ok_or_else(|| AppError::NotFound(format!("user profile {id}")))
    }

    async fn promote_to_seller(&self, id: Uuid) -> StoreResult<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "UPDATE users SET role = 'seller', seller_status = 'approved', updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        profile.ok_or_else(|| AppError::NotFound(format!("user profile {id}")))
    }

    async fn count_profiles(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_application(&self, new: NewApplication) -> StoreResult<SellerApplication> {
        let application = sqlx::query_as::<_, SellerApplication>(
            "INSERT INTO seller_applications \
             (user_id, business_name, business_type, website, experience, event_types) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(new.user_id)
        .bind(&new.business_name)
        .bind(new.business_type)
        .bind(&new.website)
        .bind(&new.experience)
        .bind(&new.event_types)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    async fn application(&self, id: Uuid) -> StoreResult<Option<SellerApplication>> {
        let application =
            sqlx::query_as::<_, SellerApplication>("SELECT * FROM seller_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    async fn transition_application(
        &self,
        id: Uuid,
        to: ApprovalStatus,
    ) -> StoreResult<Option<SellerApplication>> {
        // Pending-only conditional write: a decided row never matches.
        let application = sqlx::query_as::<_, SellerApplication>(
            "UPDATE seller_applications SET status = $2, updated_at = now() \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn applications_by_status(
        &self,
        status: ApprovalStatus,
    ) -> StoreResult<Vec<SellerApplication>> {
        let query = if status == ApprovalStatus::Pending {
            "SELECT * FROM seller_applications WHERE status = $1 ORDER BY created_at DESC"
        } else {
            "SELECT * FROM seller_applications WHERE status = $1 ORDER BY updated_at DESC"
        };
        let applications = sqlx::query_as::<_, SellerApplication>(query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(applications)
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<SellerApplication>> {
        let applications = sqlx::query_as::<_, SellerApplication>(
            "SELECT * FROM seller_applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn count_applications(&self, status: ApprovalStatus) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM seller_applications WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            "INSERT INTO events \
             (title, description, date, time, location, price, capacity, category, image_url, organizer_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.date)
        .bind(&new.time)
        .bind(&new.location)
        .bind(new.price)
        .bind(new.capacity)
        .bind(&new.category)
        .bind(&new.image_url)
        .bind(new.organizer_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    async fn event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn transition_event(
        &self,
        id: Uuid,
        to: ApprovalStatus,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET status = $2, reviewed_by = $3, reviewed_at = $4, updated_at = $4 \
             WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(to)
        .bind(reviewer)
        .bind(reviewed_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    async fn events_by_status(&self, status: ApprovalStatus) -> StoreResult<Vec<Event>> {
        let query = if status == ApprovalStatus::Pending {
            "SELECT * FROM events WHERE status = $1 ORDER BY created_at DESC"
        } else {
            "SELECT * FROM events WHERE status = $1 ORDER BY reviewed_at DESC"
        };
        let events = sqlx::query_as::<_, Event>(query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn events_for_organizer(&self, organizer_id: Uuid) -> StoreResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE organizer_id = $1 ORDER BY created_at DESC",
        )
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn approved_events(&self) -> StoreResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE status = 'approved' ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn count_events(&self, status: ApprovalStatus) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM events WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_ticket(&self, new: NewTicket) -> StoreResult<Ticket> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (event_id, user_id, quantity, total_price) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(new.event_id)
        .bind(new.user_id)
        .bind(new.quantity)
        .bind(new.total_price)
        .fetch_one(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn tickets_for_user(&self, user_id: Uuid) -> StoreResult<Vec<(Ticket, Event)>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE user_id = $1 ORDER BY purchase_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let event_ids: Vec<Uuid> = tickets.iter().map(|t| t.event_id).collect();
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ANY($1)")
            .bind(&event_ids)
            .fetch_all(&self.pool)
            .await?;
        let by_id: HashMap<Uuid, Event> = events.into_iter().map(|e| (e.id, e)).collect();

        Ok(tickets
            .into_iter()
            .filter_map(|t| by_id.get(&t.event_id).cloned().map(|e| (t, e)))
            .collect())
    }

    async fn tickets_for_events(&self, event_ids: &[Uuid]) -> StoreResult<Vec<Ticket>> {
        let tickets =
            sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE event_id = ANY($1)")
                .bind(event_ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(tickets)
    }

    async fn count_tickets_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT count(*) FROM tickets WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        confirm_token: &str,
    ) -> StoreResult<Account> {
        let result = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash, full_name, confirm_token) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(email.to_lowercase())
        .bind(password_hash)
        .bind(full_name)
        .bind(confirm_token)
        .fetch_one(&self.pool)
        .await;
        match result {
            Ok(account) => Ok(account),
            Err(e) if is_unique_violation(&e) => Err(AppError::Validation(
                "an account with this email already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn confirm_account(&self, token: &str) -> StoreResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET confirmed = true, confirm_token = NULL \
             WHERE confirm_token = $1 RETURNING *",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(account_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("account {account_id}")));
        }
        Ok(())
    }

    async fn create_session(&self, account_id: Uuid) -> StoreResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, account_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(generate_secret())
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn session(&self, id: &str) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    async fn delete_session(&self, id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_reset(&self, reset: PendingReset) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO password_resets (token, account_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&reset.token)
        .bind(reset.account_id)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn take_reset(&self, token: &str) -> StoreResult<Option<PendingReset>> {
        let reset = sqlx::query_as::<_, PendingReset>(
            "DELETE FROM password_resets WHERE token = $1 RETURNING *",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reset)
    }
}
