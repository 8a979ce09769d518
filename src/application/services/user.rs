use std::sync::Arc;

use rand::Rng;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{ports::UserStore, DomainError, User};
use crate::infrastructure::auth::password::{hash_password, verify_password};

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

pub struct UserService {
    store: Arc<dyn UserStore>,
    signup_grant: i64,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, signup_grant: i64) -> Self {
        Self {
            store,
            signup_grant,
        }
    }

    /// Creates an account with the signup credit grant and a fresh
    /// verification code.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DomainError> {
        if self.store.get_by_username(username).await?.is_some() {
            return Err(DomainError::UsernameTaken);
        }

        let user = User::new(
            username,
            hash_password(password)?,
            self.signup_grant,
            generate_verification_code(),
        );
        self.store.insert(&user).await?;
        Ok(user)
    }

    /// Looks the user up and checks the password. Unknown usernames and wrong
    /// passwords are indistinguishable to the caller.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .store
            .get_by_username(username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.store.get(id).await?.ok_or(DomainError::UserNotFound)
    }

    #[instrument(skip(self))]
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<User, DomainError> {
        let mut user = self
            .store
            .get_by_username(email)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if user.verification_code != code {
            return Err(DomainError::InvalidVerificationCode);
        }

        user.is_verified = true;
        self.store.update(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn deduct_credits(&self, user_id: Uuid, amount: i64) -> Result<User, DomainError> {
        let mut user = self.get(user_id).await?;
        user.deduct_credits(amount);
        self.store.update(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn add_credits(&self, user_id: Uuid, amount: i64) -> Result<User, DomainError> {
        let mut user = self.get(user_id).await?;
        user.add_credits(amount);
        self.store.update(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn reset_credits(&self, user_id: Uuid) -> Result<User, DomainError> {
        let mut user = self.get(user_id).await?;
        user.reset_credits();
        self.store.update(&user).await?;
        Ok(user)
    }
}

fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStore;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStore::new()), 30)
    }

    #[tokio::test]
    async fn test_register_grants_credits_and_code() {
        let users = service();
        let user = users.register("candidate@example.com", "hunter2").await.unwrap();

        assert_eq!(user.credits, 30);
        assert!(!user.is_verified);
        assert_eq!(user.verification_code.len(), CODE_LEN);
        assert_ne!(user.password_hash, "hunter2");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let users = service();
        users.register("candidate@example.com", "hunter2").await.unwrap();
        let err = users
            .register("candidate@example.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let users = service();
        let registered = users.register("candidate@example.com", "hunter2").await.unwrap();

        let user = users
            .authenticate("candidate@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        assert!(matches!(
            users
                .authenticate("candidate@example.com", "wrong")
                .await
                .unwrap_err(),
            DomainError::InvalidCredentials
        ));
        assert!(matches!(
            users.authenticate("nobody@example.com", "x").await.unwrap_err(),
            DomainError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_verify_email() {
        let users = service();
        let user = users.register("candidate@example.com", "hunter2").await.unwrap();

        assert!(matches!(
            users
                .verify_email("candidate@example.com", "WRONG!")
                .await
                .unwrap_err(),
            DomainError::InvalidVerificationCode
        ));

        let verified = users
            .verify_email("candidate@example.com", &user.verification_code)
            .await
            .unwrap();
        assert!(verified.is_verified);

        assert!(matches!(
            users.verify_email("nobody@example.com", "ABC123").await.unwrap_err(),
            DomainError::UserNotFound
        ));
    }

    #[tokio::test]
    async fn test_credit_operations() {
        let users = service();
        let user = users.register("candidate@example.com", "hunter2").await.unwrap();

        let user_after = users.deduct_credits(user.id, 10).await.unwrap();
        assert_eq!(user_after.credits, 20);

        let user_after = users.deduct_credits(user.id, 100).await.unwrap();
        assert_eq!(user_after.credits, 0);

        let user_after = users.add_credits(user.id, 200).await.unwrap();
        assert_eq!(user_after.credits, 200);

        let user_after = users.reset_credits(user.id).await.unwrap();
        assert_eq!(user_after.credits, 0);

        assert!(matches!(
            users.deduct_credits(Uuid::new_v4(), 1).await.unwrap_err(),
            DomainError::UserNotFound
        ));
    }
}
