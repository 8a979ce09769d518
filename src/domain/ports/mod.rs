mod interview_store;
mod llm;
mod mailer;
mod order_store;
mod payment;
mod user_store;

pub use interview_store::InterviewStore;
pub use llm::LlmService;
pub use mailer::Mailer;
pub use order_store::OrderStore;
pub use payment::{CheckoutSession, CreateCheckoutSession, PaymentGateway, Price};
pub use user_store::UserStore;
