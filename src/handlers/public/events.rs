// handlers/public/events.rs - Event browsing

use axum::{
    extract::State,
    Extension,
};
use serde::Serialize;

use crate::api::ApiPath;
use crate::auth::Identity;
use crate::database::models::{Event, EventRegistrant, Feedback, Registration};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// An event, plus whether the caller is registered when a credential was sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
}

/// GET /events
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    Ok(ApiResponse::success(Event::get_all(&state.pool).await?))
}

/// GET /events/:id - runs behind OptionalAuthenticate.
pub async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    identity: Option<Extension<Identity>>,
) -> ApiResult<EventDetail> {
    let event = Event::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Event not found: {}", id)))?;

    let is_registered = match identity {
        Some(Extension(identity)) => Some(Registration::is_registered(&state.pool, id, identity.id).await?),
        None => None,
    };

    Ok(ApiResponse::success(EventDetail { event, is_registered }))
}

/// GET /events/:id/registrations
pub async fn event_registrations(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
) -> ApiResult<Vec<EventRegistrant>> {
    Ok(ApiResponse::success(Registration::by_event(&state.pool, event_id).await?))
}

/// GET /events/:id/feedback - newest first.
pub async fn event_feedback(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
) -> ApiResult<Vec<Feedback>> {
    Ok(ApiResponse::success(Feedback::by_event(&state.pool, event_id).await?))
}
