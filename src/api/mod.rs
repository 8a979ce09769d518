pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use response::{ApiError, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
