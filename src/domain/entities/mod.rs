mod interview;
mod order;
mod user;

pub use interview::Interview;
pub use order::{Order, OrderStatus};
pub use user::User;
