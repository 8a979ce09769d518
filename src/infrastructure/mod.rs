pub mod auth;
pub mod config;
pub mod email;
pub mod extract;
pub mod i18n;
pub mod llm;
pub mod payment;
pub mod store;

pub use auth::{Claims, TokenError};
pub use config::AppConfig;
pub use email::SmtpMailer;
pub use i18n::Catalog;
pub use llm::OpenAiLlm;
pub use payment::StripeGateway;
pub use store::{create_pool, InMemoryStore, RedisPool, RedisStore};
