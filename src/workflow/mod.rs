//! Workflow engine for the two approval lifecycles.
//!
//! Seller applications and event requests share one state machine:
//! pending (initial) -> approved | rejected (terminal), by admin decision
//! only. Decisions on applications carry a dependent write to the owning
//! user's profile; the entity write is issued first, and a failure of the
//! dependent write is reported as a distinct partial failure instead of
//! being rolled back or swallowed. Every mutation returns the updated
//! entity so callers can refresh their view without a re-query.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    ApprovalStatus, BusinessType, Decision, Event, NewApplication, NewEvent, NewTicket, Role,
    SellerApplication, SellerStatus, Ticket, UserProfile,
};
use crate::policy;
use crate::store::EntityStore;
use crate::utils::error::AppError;

const APPLICATION: &str = "seller application";
const EVENT: &str = "event";

/// Seller application form fields as submitted.
#[derive(Debug, Clone)]
pub struct SellerApplicationFields {
    pub business_name: String,
    pub business_type: String,
    pub website: Option<String>,
    pub experience: String,
    pub event_types: String,
}

/// Event request form fields as submitted. Numeric and date fields arrive
/// as strings and are parsed here, so a malformed price or capacity is a
/// validation error, not a deserialization failure.
#[derive(Debug, Clone)]
pub struct EventRequestFields {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub location: String,
    pub price: String,
    pub capacity: String,
    pub category: String,
    pub image_url: Option<String>,
}

pub struct WorkflowEngine<E> {
    store: Arc<E>,
}

impl<E> Clone for WorkflowEngine<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<E: EntityStore> WorkflowEngine<E> {
    pub fn new(store: Arc<E>) -> Self {
        Self { store }
    }

    /// Create a pending application and mark the applicant's profile
    /// seller_status=pending. The profile write is the dependent second
    /// write; if it fails the application stands and the error says so.
    pub async fn submit_seller_application(
        &self,
        applicant: &UserProfile,
        fields: SellerApplicationFields,
    ) -> Result<SellerApplication, AppError> {
        let business_name = require_text("business name", &fields.business_name)?;
        let experience = require_text("experience", &fields.experience)?;
        let event_types = require_text("event types", &fields.event_types)?;
        let business_type = BusinessType::from_str(fields.business_type.trim())
            .map_err(|_| AppError::Validation("business type must be individual, company or nonprofit".to_string()))?;

        let application = self
            .store
            .insert_application(NewApplication {
                user_id: applicant.id,
                business_name,
                business_type,
                website: optional_text(fields.website),
                experience,
                event_types,
            })
            .await?;

        if let Err(source) = self
            .store
            .set_seller_status(applicant.id, SellerStatus::Pending)
            .await
        {
            return Err(AppError::PartialFailure {
                entity: APPLICATION,
                id: application.id,
                status: application.status,
                source: Box::new(source),
            });
        }

        tracing::info!(application_id = %application.id, user_id = %applicant.id, "Seller application submitted");
        Ok(application)
    }

    /// Admin decision on a pending application. Returns the decided
    /// application together with the owner's updated profile.
    pub async fn decide_seller_application(
        &self,
        admin: &UserProfile,
        id: Uuid,
        decision: Decision,
    ) -> Result<(SellerApplication, UserProfile), AppError> {
        policy::require_role(admin, &[Role::Admin])?;

        let application = self
            .store
            .application(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{APPLICATION} {id}")))?;
        if application.status != ApprovalStatus::Pending {
            return Err(AppError::InvalidTransition {
                entity: APPLICATION,
                id,
                status: application.status,
            });
        }

        // Entity write first; the profile write depends on it.
        let decided = match self
            .store
            .transition_application(id, decision.into())
            .await?
        {
            Some(application) => application,
            // Lost a race with another decision between the read above
            // and the conditional write.
            None => {
                let current = self
                    .store
                    .application(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("{APPLICATION} {id}")))?;
                return Err(AppError::InvalidTransition {
                    entity: APPLICATION,
                    id,
                    status: current.status,
                });
            }
        };

        let profile = match self.apply_application_side_effect(&decided).await {
            Ok(profile) => profile,
            Err(source) => {
                return Err(AppError::PartialFailure {
                    entity: APPLICATION,
                    id,
                    status: decided.status,
                    source: Box::new(source),
                })
            }
        };

        tracing::info!(
            application_id = %id,
            user_id = %decided.user_id,
            status = decided.status.as_str(),
            "Seller application decided"
        );
        Ok((decided, profile))
    }

    /// Retry the profile side effect for an already-decided application.
    /// This is the recovery path after a partial failure; it is safe to
    /// repeat because both side effects are absolute writes.
    pub async fn complete_seller_decision(
        &self,
        admin: &UserProfile,
        id: Uuid,
    ) -> Result<UserProfile, AppError> {
        policy::require_role(admin, &[Role::Admin])?;

        let application = self
            .store
            .application(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{APPLICATION} {id}")))?;
        self.apply_application_side_effect(&application).await
    }

    async fn apply_application_side_effect(
        &self,
        application: &SellerApplication,
    ) -> Result<UserProfile, AppError> {
        match application.status {
            // Approval promotes; rejection records the outcome but leaves
            // the role alone.
            ApprovalStatus::Approved => self.store.promote_to_seller(application.user_id).await,
            ApprovalStatus::Rejected => {
                self.store
                    .set_seller_status(application.user_id, SellerStatus::Rejected)
                    .await
            }
            ApprovalStatus::Pending => Err(AppError::InvalidTransition {
                entity: APPLICATION,
                id: application.id,
                status: ApprovalStatus::Pending,
            }),
        }
    }

    /// Create a pending event request. Sellers and admins only.
    pub async fn submit_event_request(
        &self,
        organizer: &UserProfile,
        fields: EventRequestFields,
    ) -> Result<Event, AppError> {
        policy::require_role(organizer, &[Role::Seller, Role::Admin])?;

        let title = require_text("title", &fields.title)?;
        let time = require_text("time", &fields.time)?;
        let location = require_text("location", &fields.location)?;
        let category = require_text("category", &fields.category)?;
        let date = NaiveDate::parse_from_str(fields.date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation("date must be formatted as YYYY-MM-DD".to_string()))?;
        let price = Decimal::from_str(fields.price.trim())
            .map_err(|_| AppError::Validation("price must be a number".to_string()))?;
        if price < Decimal::ZERO {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
        let capacity: i32 = fields
            .capacity
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("capacity must be a whole number".to_string()))?;
        if capacity <= 0 {
            return Err(AppError::Validation("capacity must be greater than zero".to_string()));
        }

        let event = self
            .store
            .insert_event(NewEvent {
                title,
                description: optional_text(fields.description),
                date,
                time,
                location,
                price,
                capacity,
                category,
                image_url: optional_text(fields.image_url),
                organizer_id: organizer.id,
            })
            .await?;

        tracing::info!(event_id = %event.id, organizer_id = %organizer.id, "Event request submitted");
        Ok(event)
    }

    /// Admin decision on a pending event, recording who reviewed it and
    /// when. A decided event rejects any further decision.
    pub async fn decide_event_request(
        &self,
        admin: &UserProfile,
        id: Uuid,
        decision: Decision,
    ) -> Result<Event, AppError> {
        policy::require_role(admin, &[Role::Admin])?;

        let event = self
            .store
            .event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{EVENT} {id}")))?;
        if event.status != ApprovalStatus::Pending {
            return Err(AppError::InvalidTransition {
                entity: EVENT,
                id,
                status: event.status,
            });
        }

        let decided = match self
            .store
            .transition_event(id, decision.into(), admin.id, Utc::now())
            .await?
        {
            Some(event) => event,
            None => {
                let current = self
                    .store
                    .event(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("{EVENT} {id}")))?;
                return Err(AppError::InvalidTransition {
                    entity: EVENT,
                    id,
                    status: current.status,
                });
            }
        };

        tracing::info!(
            event_id = %id,
            reviewer = %admin.id,
            status = decided.status.as_str(),
            "Event request decided"
        );
        Ok(decided)
    }

    /// Purchase tickets for an approved event. Unapproved events are
    /// invisible to buyers, so anything else reads as not found.
    /// Cumulative quantity against capacity is deliberately not checked.
    pub async fn purchase_ticket(
        &self,
        buyer: &UserProfile,
        event_id: Uuid,
        quantity: i32,
    ) -> Result<Ticket, AppError> {
        if quantity <= 0 {
            return Err(AppError::Validation("quantity must be greater than zero".to_string()));
        }
        let event = self
            .store
            .event(event_id)
            .await?
            .filter(|e| e.status == ApprovalStatus::Approved)
            .ok_or_else(|| AppError::NotFound(format!("{EVENT} {event_id}")))?;

        let ticket = self
            .store
            .insert_ticket(NewTicket {
                event_id,
                user_id: buyer.id,
                quantity,
                total_price: event.price * Decimal::from(quantity),
            })
            .await?;

        tracing::info!(ticket_id = %ticket.id, event_id = %event_id, buyer = %buyer.id, "Ticket purchased");
        Ok(ticket)
    }

    /// Status-filtered listing for the admin queues and history views.
    pub async fn applications_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<SellerApplication>, AppError> {
        self.store.applications_by_status(status).await
    }

    /// Status-filtered listing for the admin queues and history views.
    pub async fn events_by_status(&self, status: ApprovalStatus) -> Result<Vec<Event>, AppError> {
        self.store.events_by_status(status).await
    }
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
