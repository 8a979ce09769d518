use async_trait::async_trait;

use crate::domain::{errors::DomainError, Order};

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), DomainError>;
    async fn get_by_session(&self, session_id: &str) -> Result<Option<Order>, DomainError>;
    async fn update(&self, order: &Order) -> Result<(), DomainError>;
}
