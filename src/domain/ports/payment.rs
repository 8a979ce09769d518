use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: String,
    pub currency: String,
}

/// A hosted checkout session as reported by the payment provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_status: String,
    pub client_reference_id: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.client_reference_id
            .as_deref()
            .map(|id| id == user_id.to_string())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCheckoutSession {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub client_reference_id: String,
    pub payment_method_types: Vec<String>,
    pub wechat_pay_web_client: bool,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn price(&self, price_id: &str) -> Result<Price, DomainError>;
    async fn create_checkout_session(
        &self,
        request: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, DomainError>;
    async fn checkout_session(&self, session_id: &str) -> Result<CheckoutSession, DomainError>;
}
