pub mod auth;
pub mod response;

pub use auth::{guarded, AuthError, Guard};
pub use response::{ApiResponse, ApiResult};
