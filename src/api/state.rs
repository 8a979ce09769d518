use std::sync::Arc;

use crate::application::{AnswerService, InterviewService, OrderService, UserService};
use crate::domain::ports::{Mailer, PaymentGateway};
use crate::infrastructure::{
    AppConfig, Catalog, OpenAiLlm, RedisPool, RedisStore, SmtpMailer, StripeGateway,
};

#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub users: Arc<UserService>,
    pub interviews: Arc<InterviewService>,
    pub orders: Arc<OrderService>,
    pub answers: Arc<AnswerService>,
    pub payments: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Production wiring: Redis-backed stores, Stripe, SMTP, OpenAI.
    pub fn new(redis_pool: RedisPool, config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(RedisStore::new(redis_pool.clone()));
        let payments: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(&config.stripe));
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.smtp)?);
        let llm = Arc::new(OpenAiLlm::new(&config.llm));

        let users = Arc::new(UserService::new(store.clone(), config.credits.signup_grant));
        let interviews = Arc::new(InterviewService::new(store.clone(), users.clone()));
        let orders = Arc::new(OrderService::new(store.clone()));
        let answers = Arc::new(AnswerService::new(
            llm,
            users.clone(),
            interviews.clone(),
            config.credits.answer_cost,
        ));

        Ok(Self {
            redis_pool,
            config: Arc::new(config),
            catalog: Arc::new(Catalog::load()?),
            users,
            interviews,
            orders,
            answers,
            payments,
            mailer,
        })
    }
}
