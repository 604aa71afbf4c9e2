use std::sync::Arc;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::store::{AuthStore, EntityStore};
use crate::workflow::WorkflowEngine;

/// Shared application state, generic over the store and mailer
/// implementations so the binary runs on Postgres while tests run on the
/// in-memory stores.
pub struct AppState<E, A, M> {
    pub engine: WorkflowEngine<E>,
    pub entities: Arc<E>,
    pub auth: Arc<A>,
    pub mailer: Arc<M>,
    pub config: Config,
}

impl<E, A, M> AppState<E, A, M>
where
    E: EntityStore,
    A: AuthStore,
    M: Mailer,
{
    pub fn new(entities: Arc<E>, auth: Arc<A>, mailer: Arc<M>, config: Config) -> Self {
        Self {
            engine: WorkflowEngine::new(Arc::clone(&entities)),
            entities,
            auth,
            mailer,
            config,
        }
    }
}
