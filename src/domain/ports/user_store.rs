use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), DomainError>;
    async fn get(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn update(&self, user: &User) -> Result<(), DomainError>;
}
