use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    ports::{InterviewStore, OrderStore, UserStore},
    DomainError, Interview, Order, User,
};

/// Non-persistent store used by tests.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    interviews: RwLock<Vec<Interview>>,
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> DomainError {
    DomainError::internal(e.to_string())
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().map_err(lock_err)?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().map_err(lock_err)?;
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl InterviewStore for InMemoryStore {
    async fn insert(&self, interview: &Interview) -> Result<(), DomainError> {
        let mut interviews = self.interviews.write().map_err(lock_err)?;
        interviews.push(interview.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Interview>, DomainError> {
        let interviews = self.interviews.read().map_err(lock_err)?;
        Ok(interviews.iter().find(|i| i.id == id).cloned())
    }

    async fn ongoing_by_user(&self, user_id: Uuid) -> Result<Option<Interview>, DomainError> {
        let interviews = self.interviews.read().map_err(lock_err)?;
        Ok(interviews
            .iter()
            .find(|i| i.user_id == user_id && i.active)
            .cloned())
    }

    async fn list_ongoing(&self) -> Result<Vec<Interview>, DomainError> {
        let interviews = self.interviews.read().map_err(lock_err)?;
        Ok(interviews.iter().filter(|i| i.active).cloned().collect())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Interview>, u64), DomainError> {
        let interviews = self.interviews.read().map_err(lock_err)?;
        let mut mine: Vec<Interview> = interviews
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        let total = mine.len() as u64;
        let page = mine
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, interview: &Interview) -> Result<(), DomainError> {
        let mut interviews = self.interviews.write().map_err(lock_err)?;
        if let Some(slot) = interviews.iter_mut().find(|i| i.id == interview.id) {
            *slot = interview.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().map_err(lock_err)?;
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_by_session(&self, session_id: &str) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().map_err(lock_err)?;
        Ok(orders
            .values()
            .find(|o| o.checkout_session_id == session_id)
            .cloned())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().map_err(lock_err)?;
        orders.insert(order.id, order.clone());
        Ok(())
    }
}
