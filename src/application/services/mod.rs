mod answer;
mod interview;
mod monitor;
mod order;
mod user;

pub use answer::{AnswerOutcome, AnswerRequest, AnswerService};
pub use interview::InterviewService;
pub use monitor::{MonitorService, SweepStats};
pub use order::OrderService;
pub use user::UserService;
