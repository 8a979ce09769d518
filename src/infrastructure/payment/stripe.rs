use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{
    ports::{CheckoutSession, CreateCheckoutSession, PaymentGateway, Price},
    DomainError,
};
use crate::infrastructure::config::StripeConfig;

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(rename = "type")]
    kind: String,
    message: Option<String>,
}

/// Thin client for the two Stripe resources this service touches: prices and
/// hosted checkout sessions. Requests are form-encoded per the Stripe API.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(config: &StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DomainError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| DomainError::external(format!("Stripe response decode: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<StripeErrorEnvelope>(&body) {
            Ok(envelope) => {
                let message = envelope
                    .error
                    .message
                    .unwrap_or_else(|| envelope.error.kind.clone());
                // Malformed parameters (bad price id, bad URL) are the caller's fault.
                if envelope.error.kind == "invalid_request_error" {
                    Err(DomainError::validation(message))
                } else {
                    Err(DomainError::external(format!("Stripe: {message}")))
                }
            }
            Err(_) => Err(DomainError::external(format!("Stripe: HTTP {status}"))),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn price(&self, price_id: &str) -> Result<Price, DomainError> {
        let url = format!("{}/v1/prices/{price_id}", self.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Stripe request: {e}")))?;
        Self::parse(response).await
    }

    async fn create_checkout_session(
        &self,
        request: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, DomainError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let mut params: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("line_items[0][price]".into(), request.price_id.clone()),
            ("line_items[0][quantity]".into(), "1".into()),
            ("success_url".into(), request.success_url.clone()),
            ("cancel_url".into(), request.cancel_url.clone()),
            (
                "client_reference_id".into(),
                request.client_reference_id.clone(),
            ),
        ];
        for (n, method) in request.payment_method_types.iter().enumerate() {
            params.push((format!("payment_method_types[{n}]"), method.clone()));
        }
        if request.wechat_pay_web_client {
            params.push((
                "payment_method_options[wechat_pay][client]".into(),
                "web".into(),
            ));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Stripe request: {e}")))?;
        Self::parse(response).await
    }

    async fn checkout_session(&self, session_id: &str) -> Result<CheckoutSession, DomainError> {
        let url = format!("{}/v1/checkout/sessions/{session_id}", self.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("Stripe request: {e}")))?;
        Self::parse(response).await
    }
}
