use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// The username doubles as the account's email address.
    pub username: String,
    pub password_hash: String,
    pub credits: i64,
    pub verification_code: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        initial_credits: i64,
        verification_code: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            credits: initial_credits,
            verification_code: verification_code.into(),
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    pub fn has_credits(&self) -> bool {
        self.credits > 0
    }

    /// Deducts credits, never going below zero.
    pub fn deduct_credits(&mut self, amount: i64) {
        self.credits = (self.credits - amount).max(0);
    }

    pub fn add_credits(&mut self, amount: i64) {
        self.credits += amount;
    }

    pub fn reset_credits(&mut self) {
        self.credits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduct_credits_floors_at_zero() {
        let mut user = User::new("a@b.c", "hash", 3, "ABC123");
        user.deduct_credits(1);
        assert_eq!(user.credits, 2);
        user.deduct_credits(10);
        assert_eq!(user.credits, 0);
    }

    #[test]
    fn test_add_and_reset_credits() {
        let mut user = User::new("a@b.c", "hash", 0, "ABC123");
        assert!(!user.has_credits());
        user.add_credits(200);
        assert_eq!(user.credits, 200);
        assert!(user.has_credits());
        user.reset_credits();
        assert_eq!(user.credits, 0);
    }
}
