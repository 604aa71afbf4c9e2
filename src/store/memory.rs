//! In-memory store implementations, used by the test suites

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{AuthStore, EntityStore, StoreResult};
use crate::crypto::generate_secret;
use crate::models::{
    Account, ApprovalStatus, Event, NewApplication, NewEvent, NewProfile, NewTicket, PendingReset,
    Role, SellerApplication, SellerStatus, Session, Ticket, UserProfile,
};
use crate::utils::error::AppError;

/// In-memory entity store
#[derive(Default)]
pub struct MemoryEntityStore {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    applications: RwLock<HashMap<Uuid, SellerApplication>>,
    events: RwLock<HashMap<Uuid, Event>>,
    tickets: RwLock<HashMap<Uuid, Ticket>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a profile's role directly (for testing purposes)
    pub fn set_role(&self, id: Uuid, role: Role) -> StoreResult<()> {
        let mut profiles = self.profiles.write().unwrap();
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.role = role;
                profile.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("user profile {id}"))),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn create_profile(&self, new: NewProfile) -> StoreResult<UserProfile> {
        let now = Utc::now();
        let profile = UserProfile {
            id: new.id,
            email: new.email,
            full_name: new.full_name,
            role: Role::User,
            seller_status: SellerStatus::None,
            created_at: now,
            updated_at: now,
        };
        self.profiles
            .write()
            .unwrap()
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn profile(&self, id: Uuid) -> StoreResult<Option<UserProfile>> {
        Ok(self.profiles.read().unwrap().get(&id).cloned())
    }

    async fn set_seller_status(
        &self,
        id: Uuid,
        status: SellerStatus,
    ) -> StoreResult<UserProfile> {
        let mut profiles = self.profiles.write().unwrap();
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.seller_status = status;
                profile.updated_at = Utc::now();
                Ok(profile.clone())
            }
            None => Err(AppError::NotFound(format!("user profile {id}"))),
        }
    }

    async fn promote_to_seller(&self, id: Uuid) -> StoreResult<UserProfile> {
        let mut profiles = self.profiles.write().unwrap();
        match profiles.get_mut(&id) {
            Some(profile) => {
                profile.role = Role::Seller;
                profile.seller_status = SellerStatus::Approved;
                profile.updated_at = Utc::now();
                Ok(profile.clone())
            }
            None => Err(AppError::NotFound(format!("user profile {id}"))),
        }
    }

    async fn count_profiles(&self) -> StoreResult<i64> {
        Ok(self.profiles.read().unwrap().len() as i64)
    }

    async fn insert_application(&self, new: NewApplication) -> StoreResult<SellerApplication> {
        let now = Utc::now();
        let application = SellerApplication {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            business_name: new.business_name,
            business_type: new.business_type,
            website: new.website,
            experience: new.experience,
            event_types: new.event_types,
            status: ApprovalStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.applications
            .write()
            .unwrap()
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn application(&self, id: Uuid) -> StoreResult<Option<SellerApplication>> {
        Ok(self.applications.read().unwrap().get(&id).cloned())
    }

    async fn transition_application(
        &self,
        id: Uuid,
        to: ApprovalStatus,
    ) -> StoreResult<Option<SellerApplication>> {
        let mut applications = self.applications.write().unwrap();
        match applications.get_mut(&id) {
            Some(application) if application.status == ApprovalStatus::Pending => {
                application.status = to;
                application.updated_at = Utc::now();
                Ok(Some(application.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn applications_by_status(
        &self,
        status: ApprovalStatus,
    ) -> StoreResult<Vec<SellerApplication>> {
        let mut matching: Vec<SellerApplication> = self
            .applications
            .read()
            .unwrap()
            .values()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        if status == ApprovalStatus::Pending {
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        } else {
            matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        }
        Ok(matching)
    }

    async fn applications_for_user(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Vec<SellerApplication>> {
        let mut matching: Vec<SellerApplication> = self
            .applications
            .read()
            .unwrap()
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn count_applications(&self, status: ApprovalStatus) -> StoreResult<i64> {
        Ok(self
            .applications
            .read()
            .unwrap()
            .values()
            .filter(|a| a.status == status)
            .count() as i64)
    }

    async fn insert_event(&self, new: NewEvent) -> StoreResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            date: new.date,
            time: new.time,
            location: new.location,
            price: new.price,
            capacity: new.capacity,
            category: new.category,
            image_url: new.image_url,
            organizer_id: new.organizer_id,
            status: ApprovalStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.events.write().unwrap().insert(event.id, event.clone());
        Ok(event)
    }

    async fn event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.events.read().unwrap().get(&id).cloned())
    }

    async fn transition_event(
        &self,
        id: Uuid,
        to: ApprovalStatus,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<Event>> {
        let mut events = self.events.write().unwrap();
        match events.get_mut(&id) {
            Some(event) if event.status == ApprovalStatus::Pending => {
                event.status = to;
                event.reviewed_by = Some(reviewer);
                event.reviewed_at = Some(reviewed_at);
                event.updated_at = reviewed_at;
                Ok(Some(event.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn events_by_status(&self, status: ApprovalStatus) -> StoreResult<Vec<Event>> {
        let mut matching: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|e| e.status == status)
            .cloned()
            .collect();
        if status == ApprovalStatus::Pending {
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        } else {
            matching.sort_by(|a, b| b.reviewed_at.cmp(&a.reviewed_at));
        }
        Ok(matching)
    }

    async fn events_for_organizer(&self, organizer_id: Uuid) -> StoreResult<Vec<Event>> {
        let mut matching: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn approved_events(&self) -> StoreResult<Vec<Event>> {
        let mut matching: Vec<Event> = self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|e| e.status == ApprovalStatus::Approved)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(matching)
    }

    async fn count_events(&self, status: ApprovalStatus) -> StoreResult<i64> {
        Ok(self
            .events
            .read()
            .unwrap()
            .values()
            .filter(|e| e.status == status)
            .count() as i64)
    }

    async fn insert_ticket(&self, new: NewTicket) -> StoreResult<Ticket> {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            event_id: new.event_id,
            user_id: new.user_id,
            quantity: new.quantity,
            total_price: new.total_price,
            purchase_date: Utc::now(),
        };
        self.tickets
            .write()
            .unwrap()
            .insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn tickets_for_user(&self, user_id: Uuid) -> StoreResult<Vec<(Ticket, Event)>> {
        let events = self.events.read().unwrap();
        let mut matching: Vec<(Ticket, Event)> = self
            .tickets
            .read()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .filter_map(|t| events.get(&t.event_id).map(|e| (t.clone(), e.clone())))
            .collect();
        matching.sort_by(|a, b| b.0.purchase_date.cmp(&a.0.purchase_date));
        Ok(matching)
    }

    async fn tickets_for_events(&self, event_ids: &[Uuid]) -> StoreResult<Vec<Ticket>> {
        Ok(self
            .tickets
            .read()
            .unwrap()
            .values()
            .filter(|t| event_ids.contains(&t.event_id))
            .cloned()
            .collect())
    }

    async fn count_tickets_for_user(&self, user_id: Uuid) -> StoreResult<i64> {
        Ok(self
            .tickets
            .read()
            .unwrap()
            .values()
            .filter(|t| t.user_id == user_id)
            .count() as i64)
    }
}

/// In-memory auth store
#[derive(Default)]
pub struct MemoryAuthStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
    resets: RwLock<HashMap<String, PendingReset>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
        confirm_token: &str,
    ) -> StoreResult<Account> {
        let normalized = email.to_lowercase();
        let mut accounts = self.accounts.write().unwrap();
        if accounts.values().any(|a| a.email == normalized) {
            return Err(AppError::Validation(
                "an account with this email already exists".to_string(),
            ));
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: normalized,
            password_hash: password_hash.to_string(),
            full_name: full_name.map(|s| s.to_string()),
            confirmed: false,
            confirm_token: Some(confirm_token.to_string()),
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(&id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let normalized = email.to_lowercase();
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == normalized)
            .cloned())
    }

    async fn confirm_account(&self, token: &str) -> StoreResult<Option<Account>> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.confirm_token.as_deref() == Some(token));
        match account {
            Some(account) => {
                account.confirmed = true;
                account.confirm_token = None;
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut accounts = self.accounts.write().unwrap();
        match accounts.get_mut(&account_id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("account {account_id}"))),
        }
    }

    async fn create_session(&self, account_id: Uuid) -> StoreResult<Session> {
        let session = Session {
            id: generate_secret(),
            account_id,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn session(&self, id: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().unwrap().get(id).cloned())
    }

    async fn delete_session(&self, id: &str) -> StoreResult<()> {
        self.sessions.write().unwrap().remove(id);
        Ok(())
    }

    async fn create_reset(&self, reset: PendingReset) -> StoreResult<()> {
        self.resets
            .write()
            .unwrap()
            .insert(reset.token.clone(), reset);
        Ok(())
    }

    async fn take_reset(&self, token: &str) -> StoreResult<Option<PendingReset>> {
        Ok(self.resets.write().unwrap().remove(token))
    }
}
