// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;
use serde::Deserialize;

use crate::api::{FieldErrors, Validate, ValidatedJson};
use crate::auth::Role;
use crate::database::models::{NewUser, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{normalize_email, AuthPayload};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.text("firstName", &self.first_name, 1, 50);
        errors.text("lastName", &self.last_name, 1, 50);
        errors.text("email", &self.email, 1, 255);
        errors.email("email", self.email.trim());
        errors.text("password", &self.password, 8, 128);
        if let Some(bio) = &self.bio {
            errors.text("bio", bio, 0, 1000);
        }
        if let Some(pic) = &self.profile_pic {
            errors.text("profilePic", pic, 0, 255);
        }
        errors.into_result()
    }
}

/// POST /auth/register - Create an account and sign the caller in.
///
/// Accounts created here always get the `user` role.
pub async fn register_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    let email = normalize_email(&body.email);
    let password_hash = state.passwords.hash(&body.password).await?;

    let user = User::register(
        &state.pool,
        NewUser {
            first_name: body.first_name.trim(),
            last_name: body.last_name.trim(),
            email: &email,
            password_hash: &password_hash,
            role: Role::User,
            bio: body.bio.as_deref(),
            profile_pic: body.profile_pic.as_deref(),
        },
    )
    .await?;

    let token = state.keys.issue(&user.identity())?;
    tracing::info!("Registered user {}", user.id);

    Ok(ApiResponse::created(AuthPayload { user, token }))
}
