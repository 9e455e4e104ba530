// handlers/public/auth/mod.rs - Credential acquisition
//
// POST /auth/register and POST /auth/login both answer with the account and a
// freshly signed credential. Logout is stateless: the client drops its token.

use serde::Serialize;
use serde_json::{json, Value};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};

pub mod login;
pub mod register;

pub use login::login_post;
pub use register::register_post;

/// Body returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// POST /auth/logout
pub async fn logout_post() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "message": "Logged out" })))
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
