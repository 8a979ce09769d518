use bcrypt::{hash, verify, DEFAULT_COST};

use crate::domain::DomainError;

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    hash(password, DEFAULT_COST).map_err(|e| DomainError::internal(format!("bcrypt hash: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, DomainError> {
    verify(password, password_hash)
        .map_err(|e| DomainError::internal(format!("bcrypt verify: {e}")))
}
