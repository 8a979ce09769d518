use async_trait::async_trait;

use crate::domain::errors::DomainError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, to: &str, code: &str) -> Result<(), DomainError>;
}
