//! Storage abstractions over the four marketplace tables and the auth
//! provider's own state. Two implementations: Postgres for the server
//! binary, in-memory for tests.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAuthStore, MemoryEntityStore};
pub use postgres::{PgAuthStore, PgEntityStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Account, ApprovalStatus, Event, NewApplication, NewEvent, NewProfile, NewTicket, PendingReset,
    SellerApplication, SellerStatus, Session, Ticket, UserProfile,
};
use crate::utils::error::AppError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AppError>;

/// Single-row reads and writes over users, seller applications, events
/// and tickets. The store does not know the workflow rules; it only
/// guarantees that a status transition is a single conditional write, so
/// an entity that is no longer pending can never transition again.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a profile with role=user, seller_status=none.
    async fn create_profile(&self, new: NewProfile) -> StoreResult<UserProfile>;

    async fn profile(&self, id: Uuid) -> StoreResult<Option<UserProfile>>;

    /// Overwrite the denormalized seller status, leaving the role alone.
    async fn set_seller_status(&self, id: Uuid, status: SellerStatus)
        -> StoreResult<UserProfile>;

    /// Single write setting role=seller and seller_status=approved.
    async fn promote_to_seller(&self, id: Uuid) -> StoreResult<UserProfile>;

    async fn count_profiles(&self) -> StoreResult<i64>;

    async fn insert_application(&self, new: NewApplication) -> StoreResult<SellerApplication>;

    async fn application(&self, id: Uuid) -> StoreResult<Option<SellerApplication>>;

    /// Conditional transition: succeeds only while the row is pending,
    /// returning the updated row. `None` means the row was not pending
    /// at write time (decided earlier, or lost a race).
    async fn transition_application(
        &self,
        id: Uuid,
        to: ApprovalStatus,
    ) -> StoreResult<Option<SellerApplication>>;

    /// Pending queues are ordered by creation time descending; decided
    /// listings by update time descending.
    async fn applications_by_status(
        &self,
        status: ApprovalStatus,
    ) -> StoreResult<Vec<SellerApplication>>;

    async fn applications_for_user(&self, user_id: Uuid) -> StoreResult<Vec<SellerApplication>>;

    async fn count_applications(&self, status: ApprovalStatus) -> StoreResult<i64>;

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event>;

    async fn event(&self, id: Uuid) -> StoreResult<Option<Event>>;

    /// Conditional transition recording the reviewer and review time.
    /// Same pending-only semantics as [`transition_application`].
    ///
    /// [`transition_application`]: EntityStore::transition_application
    async fn transition_event(
        &self,
        id: Uuid,
        to: ApprovalStatus,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<Event>>;

    /// Pending queue by creation time descending; decided listings by
    /// review time descending.
    async fn events_by_status(&self, status: ApprovalStatus) -> StoreResult<Vec<Event>>;

    async fn events_for_organizer(&self, organizer_id: Uuid) -> StoreResult<Vec<Event>>;

    /// Public listing: approved events ordered by event date ascending.
    async fn approved_events(&self) -> StoreResult<Vec<Event>>;

    async fn count_events(&self, status: ApprovalStatus) -> StoreResult<i64>;

    async fn insert_ticket(&self, new: NewTicket) -> StoreResult<Ticket>;

    /// A user's tickets joined with their events, newest purchase first.
    async fn tickets_for_user(&self, user_id: Uuid) -> StoreResult<Vec<(Ticket, Event)>>;

    /// All tickets sold across a set of events (seller dashboard).
    async fn tickets_for_events(&self, event_ids: &[Uuid]) -> StoreResult<Vec<Ticket>>;

    async fn count_tickets_for_user(&self, user_id: Uuid) -> StoreResult<i64>;
}

/// Credential, session and reset-token storage for the auth provider.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Create an unconfirmed account. Fails with a validation error if
    /// the email is already taken.
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        confirm_token: &str,
    ) -> StoreResult<Account>;

    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>>;

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Mark the account holding this token as confirmed, consuming the
    /// token. `None` if no account holds it.
    async fn confirm_account(&self, token: &str) -> StoreResult<Option<Account>>;

    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> StoreResult<()>;

    async fn create_session(&self, account_id: Uuid) -> StoreResult<Session>;

    async fn session(&self, id: &str) -> StoreResult<Option<Session>>;

    async fn delete_session(&self, id: &str) -> StoreResult<()>;

    async fn create_reset(&self, reset: PendingReset) -> StoreResult<()>;

    /// Fetch and delete a pending reset in one step so a token cannot be
    /// replayed.
    async fn take_reset(&self, token: &str) -> StoreResult<Option<PendingReset>>;
}
