// handlers/elevated/admin.rs - /admin/* user, event and feedback management

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiPath, FieldErrors, Validate, ValidatedJson};
use crate::auth::Role;
use crate::database::models::{Event, Feedback, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: String,
}

impl Validate for RoleRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("role", Role::parse(&self.role).is_some(), "must be 'admin' or 'user'");
        errors.into_result()
    }
}

/// GET /admin/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(User::get_all(&state.pool).await?))
}

/// GET /admin/users/search?query=
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Vec<User>> {
    let term = params.query.trim();
    if term.is_empty() {
        return Err(ApiError::bad_request("Search query is required"));
    }
    Ok(ApiResponse::success(User::search(&state.pool, term).await?))
}

/// DELETE /admin/users/:id
pub async fn delete_user(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> ApiResult<Value> {
    User::delete(&state.pool, id).await?;
    tracing::info!("Deleted user {}", id);
    Ok(ApiResponse::success(json!({ "message": "User deleted" })))
}

/// PATCH /admin/users/:id/role
pub async fn update_user_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> ApiResult<User> {
    let role = Role::parse(&body.role).ok_or_else(|| ApiError::bad_request("Invalid role"))?;

    let user = User::update_role(&state.pool, id, role)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user found with ID: {}", id)))?;

    tracing::info!("User {} is now {}", id, role.as_str());
    Ok(ApiResponse::success(user))
}

/// GET /admin/events
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    Ok(ApiResponse::success(Event::get_all(&state.pool).await?))
}

/// GET /admin/feedback/:id - all feedback for event `id`.
pub async fn event_feedback(State(state): State<AppState>, ApiPath(event_id): ApiPath<i32>) -> ApiResult<Vec<Feedback>> {
    Ok(ApiResponse::success(Feedback::by_event(&state.pool, event_id).await?))
}

/// DELETE /admin/feedback/:id - feedback `id`, whatever its event.
pub async fn delete_feedback(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> ApiResult<Value> {
    if !Feedback::delete(&state.pool, id).await? {
        return Err(ApiError::not_found(format!("Feedback not found: {}", id)));
    }
    Ok(ApiResponse::success(json!({ "message": "Feedback deleted" })))
}
