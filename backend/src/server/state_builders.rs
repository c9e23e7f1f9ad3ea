//! Wiring of domain services over the configured storage adapter.

use std::sync::Arc;

use actix_web::web;

use slumbertrack::domain::ports::{AccountRepository, SleepGoalRepository, SleepSessionRepository};
use slumbertrack::domain::{AccountService, SleepGoalService, SleepSessionService};
use slumbertrack::inbound::http::state::{HttpState, HttpStatePorts};
use slumbertrack::outbound::memory::InMemorySleepStore;
use slumbertrack::outbound::persistence::{
    DieselAccountRepository, DieselSleepGoalRepository, DieselSleepSessionRepository,
};

use super::ServerConfig;

/// Services over PostgreSQL when a pool is configured, otherwise over one
/// shared in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => services_over(
            Arc::new(DieselSleepSessionRepository::new(pool.clone())),
            Arc::new(DieselSleepGoalRepository::new(pool.clone())),
            Arc::new(DieselAccountRepository::new(pool.clone())),
        ),
        None => {
            let store = Arc::new(InMemorySleepStore::new());
            services_over(store.clone(), store.clone(), store)
        }
    };
    web::Data::new(state)
}

fn services_over<S, G, A>(sessions: Arc<S>, goals: Arc<G>, accounts: Arc<A>) -> HttpState
where
    S: SleepSessionRepository + 'static,
    G: SleepGoalRepository + 'static,
    A: AccountRepository + 'static,
{
    let session_service = Arc::new(SleepSessionService::new(sessions.clone(), goals.clone()));
    let goal_service = Arc::new(SleepGoalService::new(goals, sessions));
    let account_service = Arc::new(AccountService::new(accounts));
    HttpState::new(HttpStatePorts {
        login: account_service.clone(),
        signup: account_service.clone(),
        users: account_service,
        sessions: session_service.clone(),
        sessions_query: session_service,
        goal: goal_service.clone(),
        goal_query: goal_service,
    })
}
