use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Interview};

#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn insert(&self, interview: &Interview) -> Result<(), DomainError>;
    async fn get(&self, id: Uuid) -> Result<Option<Interview>, DomainError>;
    async fn ongoing_by_user(&self, user_id: Uuid) -> Result<Option<Interview>, DomainError>;
    /// All interviews currently marked active, across users. Scanned by the monitor.
    async fn list_ongoing(&self) -> Result<Vec<Interview>, DomainError>;
    /// A page of the user's interviews, newest first, plus the total count.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Interview>, u64), DomainError>;
    async fn update(&self, interview: &Interview) -> Result<(), DomainError>;
}
