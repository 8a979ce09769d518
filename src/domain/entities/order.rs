use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Amount in the currency's minor units, as reported by the payment provider.
    pub amount: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub checkout_session_id: String,
    pub price_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn pending_checkout(
        user_id: Uuid,
        amount: i64,
        currency: impl Into<String>,
        checkout_session_id: impl Into<String>,
        price_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            currency: currency.into(),
            status: OrderStatus::Pending,
            checkout_session_id: checkout_session_id.into(),
            price_id: price_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}
