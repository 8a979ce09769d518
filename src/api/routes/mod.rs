pub mod answers;
pub mod auth;
pub mod health;
pub mod interviews;
pub mod payments;
pub mod uploads;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::{middleware::from_fn, middleware::from_fn_with_state};
use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::{auth as auth_mw, logging, rate_limit};
use crate::api::state::AppState;
use crate::infrastructure::extract::MAX_UPLOAD_BYTES;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes(&state))
        .layer(from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_v1_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/verify-email", get(auth::verify_email))
        .layer(from_fn_with_state(state.clone(), rate_limit::rate_limit));

    // Auth is the outer layer, so the limiter sees the claims.
    let protected = Router::new()
        .route("/users/me", get(users::user_info))
        .route(
            "/interviews",
            get(interviews::interview_history).post(interviews::start_interview),
        )
        .route("/interviews/end", post(interviews::end_interview))
        .route("/answers", post(answers::generate_answer))
        .route(
            "/resumes",
            post(uploads::upload_resume).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/checkout/sessions", post(payments::create_checkout_session))
        .route(
            "/checkout/sessions/confirm",
            post(payments::confirm_checkout_session),
        )
        .layer(from_fn_with_state(state.clone(), rate_limit::rate_limit))
        .layer(from_fn_with_state(state.clone(), auth_mw::require_auth));

    public.merge(protected)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::application::{AnswerService, InterviewService, OrderService, UserService};
    use crate::domain::ports::{
        CheckoutSession, CreateCheckoutSession, LlmService, Mailer, PaymentGateway, Price,
    };
    use crate::domain::DomainError;
    use crate::infrastructure::config::CreditPackage;
    use crate::infrastructure::{create_pool, AppConfig, Catalog, InMemoryStore};

    struct StubLlm;

    #[async_trait]
    impl LlmService for StubLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, DomainError> {
            Ok("stub answer".into())
        }

        async fn complete_with_system(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, DomainError> {
            Ok("stub answer".into())
        }
    }

    struct NoopMailer;

    #[async_trait]
    impl Mailer for NoopMailer {
        async fn send_verification(&self, _to: &str, _code: &str) -> Result<(), DomainError> {
            Ok(())
        }
    }

    /// Gateway that records created sessions and reports them as paid.
    #[derive(Default)]
    struct StubGateway {
        sessions: std::sync::RwLock<std::collections::HashMap<String, CheckoutSession>>,
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn price(&self, price_id: &str) -> Result<Price, DomainError> {
            Ok(Price {
                id: price_id.to_string(),
                currency: "usd".into(),
            })
        }

        async fn create_checkout_session(
            &self,
            request: &CreateCheckoutSession,
        ) -> Result<CheckoutSession, DomainError> {
            let session = CheckoutSession {
                id: format!("cs_{}", request.price_id),
                url: Some("https://checkout.example/session".into()),
                amount_total: Some(5999),
                currency: Some("usd".into()),
                payment_status: "paid".into(),
                client_reference_id: Some(request.client_reference_id.clone()),
            };
            self.sessions
                .write()
                .unwrap()
                .insert(session.id.clone(), session.clone());
            Ok(session)
        }

        async fn checkout_session(&self, session_id: &str) -> Result<CheckoutSession, DomainError> {
            self.sessions
                .read()
                .unwrap()
                .get(session_id)
                .cloned()
                .ok_or(DomainError::OrderNotFound)
        }
    }

    fn test_state(payments: Arc<dyn PaymentGateway>) -> AppState {
        let store = Arc::new(InMemoryStore::new());
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "access-secret".into();
        config.auth.refresh_secret = "refresh-secret".into();
        config.credits.packages = vec![CreditPackage {
            price_id: "price_a".into(),
            credits: 200,
        }];

        let users = Arc::new(UserService::new(store.clone(), config.credits.signup_grant));
        let interviews = Arc::new(InterviewService::new(store.clone(), users.clone()));
        let orders = Arc::new(OrderService::new(store.clone()));
        let answers = Arc::new(AnswerService::new(
            Arc::new(StubLlm),
            users.clone(),
            interviews.clone(),
            config.credits.answer_cost,
        ));

        AppState {
            // Never connected in tests; the limiter fails open.
            redis_pool: create_pool("redis://127.0.0.1:1").unwrap(),
            config: Arc::new(config),
            catalog: Arc::new(Catalog::load().unwrap()),
            users,
            interviews,
            orders,
            answers,
            payments,
            mailer: Arc::new(NoopMailer),
        }
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register_and_login(router: &Router) -> (Uuid, String) {
        let (status, _) = send(
            router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({"username": "candidate@example.com", "password": "hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            router,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "candidate@example.com", "password": "hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let user_id = body["data"]["user_id"].as_str().unwrap().parse().unwrap();
        let token = body["data"]["access_token"].as_str().unwrap().to_string();
        (user_id, token)
    }

    #[tokio::test]
    async fn test_register_login_and_profile() {
        let router = create_router(test_state(Arc::new(StubGateway::default())));
        let (_, token) = register_and_login(&router).await;

        let (status, body) = send(&router, "GET", "/api/v1/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["username"], json!("candidate@example.com"));
        assert_eq!(body["data"]["credits"], json!(30));
        assert_eq!(body["data"]["is_verified"], json!(false));

        // No token, no profile.
        let (status, body) = send(&router, "GET", "/api/v1/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], json!("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let router = create_router(test_state(Arc::new(StubGateway::default())));
        register_and_login(&router).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({"username": "candidate@example.com", "password": "other"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], json!("USERNAME_ALREADY_EXISTS"));
    }

    #[tokio::test]
    async fn test_interview_lifecycle_and_answers() {
        let router = create_router(test_state(Arc::new(StubGateway::default())));
        let (_, token) = register_and_login(&router).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/interviews",
            Some(&token),
            Some(json!({"position_name": "Backend Engineer", "resume_url": "https://x/cv"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let interview_id = body["data"]["interview_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/interviews",
            Some(&token),
            Some(json!({"position_name": "Other", "resume_url": "https://x/cv"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INTERVIEW_ALREADY_STARTED"));

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/answers",
            Some(&token),
            Some(json!({
                "interview_id": interview_id,
                "job_position": "Backend Engineer",
                "question": "Why Rust?",
                "resume_content": "Systems programming background."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["response"], json!("stub answer"));
        assert_eq!(body["data"]["remaining_credits"], json!(29));

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/interviews/end",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["duration_minutes"].is_number());

        let (status, body) = send(
            &router,
            "GET",
            "/api/v1/interviews?page=1&limit=10",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pagination"]["total_items"], json!(1));
    }

    #[tokio::test]
    async fn test_checkout_flow_credits_user() {
        let router = create_router(test_state(Arc::new(StubGateway::default())));
        let (_, token) = register_and_login(&router).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/checkout/sessions",
            Some(&token),
            Some(json!({
                "price_id": "price_a",
                "success_url": "https://app/success",
                "cancel_url": "https://app/cancel"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["amount"], json!(5999));

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/checkout/sessions/confirm",
            Some(&token),
            Some(json!({"session_id": session_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["credits"], json!(200));
        assert_eq!(body["data"]["total_credits"], json!(230));
    }

    #[tokio::test]
    async fn test_refresh_token_flow() {
        let router = create_router(test_state(Arc::new(StubGateway::default())));
        register_and_login(&router).await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "candidate@example.com", "password": "hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/refresh")
            .header("x-refresh-token", &refresh_token)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Missing header is a 400, not a 401.
        let (status, body) = send(&router, "POST", "/api/v1/auth/refresh", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], json!("INVALID_INPUT"));
    }
}
