//! Top City Tickets API server
//!
//! A ticketing marketplace: users buy tickets to approved events, sellers
//! apply for seller status and submit events for review, admins work the
//! pending queues. The approval workflow and the access policy live in
//! [`workflow`] and [`policy`]; everything else is the HTTP surface over
//! them.

pub mod config;
pub mod crypto;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod policy;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use mailer::{ConsoleMailer, Mailer};
pub use state::AppState;
pub use store::{
    AuthStore, EntityStore, MemoryAuthStore, MemoryEntityStore, PgAuthStore, PgEntityStore,
};
pub use workflow::WorkflowEngine;
