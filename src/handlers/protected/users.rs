// handlers/protected/users.rs - Profile endpoints (RequireSelfOrAdmin on :id)

use axum::extract::State;
use serde::Deserialize;

use crate::api::validate::nullable;
use crate::api::{ApiPath, FieldErrors, Validate, ValidatedJson};
use crate::database::models::{Registration, User, UserRegistration, USER_COLUMNS};
use crate::database::{sql_for_partial_update, FieldMap};
use crate::error::ApiError;
use crate::handlers::public::auth::normalize_email;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Profile fields a user may change. Anything else in the body is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_pic: Option<Option<String>>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(v) = &self.first_name {
            errors.text("firstName", v, 1, 50);
        }
        if let Some(v) = &self.last_name {
            errors.text("lastName", v, 1, 50);
        }
        if let Some(v) = &self.email {
            errors.email("email", v.trim());
        }
        if let Some(v) = &self.password {
            errors.text("password", v, 8, 128);
        }
        if let Some(Some(v)) = &self.bio {
            errors.text("bio", v, 0, 1000);
        }
        if let Some(Some(v)) = &self.profile_pic {
            errors.text("profilePic", v, 0, 255);
        }
        errors.into_result()
    }
}

impl UpdateUserRequest {
    /// Field map keyed by payload names; `password_hash` replaces the plain text.
    fn into_fields(self, password_hash: Option<String>) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert_some("firstName", self.first_name.map(|v| v.trim().to_string()));
        fields.insert_some("lastName", self.last_name.map(|v| v.trim().to_string()));
        fields.insert_some("email", self.email.as_deref().map(normalize_email));
        fields.insert_some("password", password_hash);
        fields.insert_some("bio", self.bio);
        fields.insert_some("profilePic", self.profile_pic);
        fields
    }
}

/// GET /users/:id
pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> ApiResult<User> {
    let user = User::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user found with ID: {}", id)))?;
    Ok(ApiResponse::success(user))
}

/// PATCH /users/:id - partial profile update.
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let password_hash = match &body.password {
        Some(password) => Some(state.passwords.hash(password).await?),
        None => None,
    };

    let fields = body.into_fields(password_hash);
    let update = sql_for_partial_update(&fields, USER_COLUMNS)?;

    let user = User::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user found with ID: {}", id)))?;

    tracing::info!("Updated profile for user {}", id);
    Ok(ApiResponse::success(user))
}

/// GET /users/:id/registrations
pub async fn user_registrations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Vec<UserRegistration>> {
    Ok(ApiResponse::success(Registration::by_user(&state.pool, id).await?))
}
