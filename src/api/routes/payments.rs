use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::response::{map_domain, ok, ApiError, ApiResult, Lang};
use crate::api::state::AppState;
use crate::domain::ports::CreateCheckoutSession;
use crate::domain::DomainError;
use crate::infrastructure::Claims;

const WECHAT_PAY_SUPPORTED_CURRENCIES: [&str; 13] = [
    "aud", "cny", "cad", "chf", "eur", "dkk", "nok", "sek", "gbp", "hkd", "jpy", "sgd", "usd",
];

fn is_wechat_pay_supported(currency: &str) -> bool {
    WECHAT_PAY_SUPPORTED_CURRENCIES.contains(&currency.to_lowercase().as_str())
}

#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub price_id: String,
    #[serde(default)]
    pub success_url: String,
    #[serde(default)]
    pub cancel_url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    pub session_id: String,
    pub session_url: Option<String>,
    pub amount: i64,
    pub currency: String,
}

pub async fn create_checkout_session(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateCheckoutRequest>,
) -> ApiResult<CreateCheckoutResponse> {
    if request.price_id.is_empty() || request.success_url.is_empty() || request.cancel_url.is_empty()
    {
        return Err(ApiError::invalid_input(&state.catalog, &lang));
    }

    let price = state
        .payments
        .price(&request.price_id)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    let mut payment_method_types = vec!["card".to_string(), "alipay".to_string()];
    let wechat = is_wechat_pay_supported(&price.currency);
    if wechat {
        payment_method_types.push("wechat_pay".to_string());
    }

    let session = state
        .payments
        .create_checkout_session(&CreateCheckoutSession {
            price_id: request.price_id.clone(),
            success_url: request.success_url,
            cancel_url: request.cancel_url,
            client_reference_id: claims.sub.to_string(),
            payment_method_types,
            wechat_pay_web_client: wechat,
        })
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    let amount = session.amount_total.unwrap_or(0);
    let currency = session
        .currency
        .clone()
        .unwrap_or_else(|| price.currency.clone());

    state
        .orders
        .create_checkout(claims.sub, amount, &currency, &session.id, &request.price_id)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(CreateCheckoutResponse {
        session_id: session.id,
        session_url: session.url,
        amount,
        currency,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmCheckoutRequest {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmCheckoutResponse {
    pub message: String,
    pub order_id: Uuid,
    pub credits: i64,
    pub total_credits: i64,
}

pub async fn confirm_checkout_session(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
    Json(request): Json<ConfirmCheckoutRequest>,
) -> ApiResult<ConfirmCheckoutResponse> {
    if request.session_id.is_empty() {
        return Err(ApiError::invalid_input(&state.catalog, &lang));
    }

    let session = state
        .payments
        .checkout_session(&request.session_id)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    if !session.is_paid() {
        return Err(map_domain(
            DomainError::PaymentIncomplete,
            &state.catalog,
            &lang,
        ));
    }
    if !session.belongs_to(claims.sub) {
        return Err(map_domain(DomainError::Forbidden, &state.catalog, &lang));
    }

    let order = state
        .orders
        .complete_by_session(&request.session_id)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    let credits = state.config.credits.credits_for_price(&order.price_id);
    let user = state
        .users
        .add_credits(claims.sub, credits)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(ConfirmCheckoutResponse {
        message: state.catalog.translate(&lang, "payment_confirmed"),
        order_id: order.id,
        credits,
        total_credits: user.credits,
    }))
}
