// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;
use serde::Deserialize;

use crate::api::{FieldErrors, Validate, ValidatedJson};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{normalize_email, AuthPayload};

const INVALID_LOGIN: &str = "Invalid email/password";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("email", !self.email.trim().is_empty(), "is required");
        errors.check("password", !self.password.is_empty(), "is required");
        errors.into_result()
    }
}

/// POST /auth/login - Exchange email and password for a credential.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthPayload> {
    let email = normalize_email(&body.email);

    let Some((user, stored_hash)) = User::find_credentials(&state.pool, &email).await? else {
        state.passwords.verify_decoy(&body.password).await?;
        tracing::info!("Login failed: unknown account");
        return Err(ApiError::unauthorized(INVALID_LOGIN));
    };

    if !state.passwords.verify(&body.password, &stored_hash).await? {
        tracing::info!("Login failed: bad password for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_LOGIN));
    }

    let token = state.keys.issue(&user.identity())?;
    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(AuthPayload { user, token }))
}
