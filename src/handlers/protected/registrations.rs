// handlers/protected/registrations.rs - Sign up for and leave events

use axum::{
    extract::State,
    Extension,
};
use serde_json::{json, Value};

use crate::api::ApiPath;
use crate::auth::Identity;
use crate::database::models::Registration;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /events/:id/register
pub async fn register_for_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Registration> {
    let registration = Registration::register(&state.pool, event_id, identity.id).await?;
    tracing::info!("User {} registered for event {}", identity.id, event_id);
    Ok(ApiResponse::created(registration))
}

/// DELETE /events/:id/register
pub async fn unregister_from_event(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    if !Registration::unregister(&state.pool, event_id, identity.id).await? {
        return Err(ApiError::not_found("Registration not found"));
    }

    tracing::info!("User {} left event {}", identity.id, event_id);
    Ok(ApiResponse::success(json!({ "message": "Registration cancelled" })))
}
