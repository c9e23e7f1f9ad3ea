//! Process-local storage adapter used when no database URL is configured.
//!
//! One [`InMemorySleepStore`] backs the session, goal, and account ports so a
//! single instance can be shared by every service. Data is lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NewAccount, SleepGoalRepository,
    SleepGoalRepositoryError, SleepSessionRepository, SleepSessionRepositoryError, StoredAccount,
};
use crate::domain::{Page, PageRequest, SessionRange, SleepGoal, SleepSession, User, UserId};

#[derive(Debug, Default)]
struct StoreState {
    sessions: HashMap<Uuid, SleepSession>,
    goals: HashMap<UserId, SleepGoal>,
    accounts: HashMap<UserId, StoredAccount>,
}

impl StoreState {
    /// The owner's sessions ordered newest start first, ties broken by id.
    fn owned_sessions<'a>(
        &'a self,
        owner: &'a UserId,
    ) -> impl Iterator<Item = &'a SleepSession> + 'a {
        let mut owned: Vec<&SleepSession> = self
            .sessions
            .values()
            .filter(|session| session.user_id() == owner)
            .collect();
        owned.sort_by(|a, b| b.start().cmp(&a.start()).then_with(|| b.id().cmp(&a.id())));
        owned.into_iter()
    }
}

/// Mutex-guarded maps implementing every storage port.
#[derive(Debug, Default)]
pub struct InMemorySleepStore {
    state: Mutex<StoreState>,
}

impl InMemorySleepStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, StoreState>, E> {
        self.state
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl SleepSessionRepository for InMemorySleepStore {
    async fn insert(&self, session: &SleepSession) -> Result<(), SleepSessionRepositoryError> {
        let mut state = self.lock(SleepSessionRepositoryError::query)?;
        if state.sessions.contains_key(&session.id()) {
            return Err(SleepSessionRepositoryError::query(format!(
                "session {} already exists",
                session.id()
            )));
        }
        state.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &SleepSession) -> Result<bool, SleepSessionRepositoryError> {
        let mut state = self.lock(SleepSessionRepositoryError::query)?;
        match state.sessions.get_mut(&session.id()) {
            Some(stored) if stored.user_id() == session.user_id() => {
                *stored = session.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, SleepSessionRepositoryError> {
        let mut state = self.lock(SleepSessionRepositoryError::query)?;
        let owned = state
            .sessions
            .get(&id)
            .is_some_and(|session| session.user_id() == owner);
        if owned {
            state.sessions.remove(&id);
        }
        Ok(owned)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<SleepSession>, SleepSessionRepositoryError> {
        let state = self.lock(SleepSessionRepositoryError::query)?;
        Ok(state
            .sessions
            .get(&id)
            .filter(|session| session.user_id() == owner)
            .cloned())
    }

    async fn list(
        &self,
        owner: &UserId,
        range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SleepSession>, SleepSessionRepositoryError> {
        let state = self.lock(SleepSessionRepositoryError::query)?;
        let matching = state
            .owned_sessions(owner)
            .filter(|session| range.contains(session.start()))
            .cloned()
            .collect();
        Ok(Page::from_ordered(matching, page))
    }

    async fn list_all(
        &self,
        owner: &UserId,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        let state = self.lock(SleepSessionRepositoryError::query)?;
        Ok(state.owned_sessions(owner).cloned().collect())
    }

    async fn recent(
        &self,
        owner: &UserId,
        limit: usize,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        let state = self.lock(SleepSessionRepositoryError::query)?;
        Ok(state.owned_sessions(owner).take(limit).cloned().collect())
    }

    async fn count_for_user(&self, owner: &UserId) -> Result<u64, SleepSessionRepositoryError> {
        let state = self.lock(SleepSessionRepositoryError::query)?;
        Ok(state.owned_sessions(owner).count() as u64)
    }
}

#[async_trait]
impl SleepGoalRepository for InMemorySleepStore {
    async fn find_for_user(
        &self,
        owner: &UserId,
    ) -> Result<Option<SleepGoal>, SleepGoalRepositoryError> {
        let state = self.lock(SleepGoalRepositoryError::query)?;
        Ok(state.goals.get(owner).cloned())
    }

    async fn upsert(&self, goal: &SleepGoal) -> Result<(), SleepGoalRepositoryError> {
        let mut state = self.lock(SleepGoalRepositoryError::query)?;
        state.goals.insert(goal.user_id().clone(), goal.clone());
        Ok(())
    }

    async fn delete_for_user(&self, owner: &UserId) -> Result<bool, SleepGoalRepositoryError> {
        let mut state = self.lock(SleepGoalRepositoryError::query)?;
        Ok(state.goals.remove(owner).is_some())
    }
}

#[async_trait]
impl AccountRepository for InMemorySleepStore {
    async fn create(&self, account: &NewAccount) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock(AccountRepositoryError::query)?;
        let taken = state
            .accounts
            .values()
            .any(|stored| stored.user.username() == &account.username);
        if taken {
            return Err(AccountRepositoryError::duplicate_username(
                account.username.as_ref(),
            ));
        }
        state.accounts.insert(
            account.id.clone(),
            StoredAccount {
                user: User::new(account.id.clone(), account.username.clone()),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let state = self.lock(AccountRepositoryError::query)?;
        Ok(state
            .accounts
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountRepositoryError> {
        let state = self.lock(AccountRepositoryError::query)?;
        Ok(state.accounts.get(id).map(|stored| stored.user.clone()))
    }
}
