// handlers/protected/feedback.rs - Feedback authoring (author or admin for edits)

use axum::{
    extract::State,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiPath, FieldErrors, Validate, ValidatedJson};
use crate::auth::Identity;
use crate::database::models::{Feedback, FEEDBACK_COLUMNS};
use crate::database::{sql_for_partial_update, FieldMap};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthError};
use crate::state::AppState;

const MAX_CONTENT: usize = 2000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub content: String,
}

impl Validate for FeedbackRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.text("content", &self.content, 1, MAX_CONTENT);
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateFeedbackRequest {
    pub content: Option<String>,
}

impl Validate for UpdateFeedbackRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(content) = &self.content {
            errors.text("content", content, 1, MAX_CONTENT);
        }
        errors.into_result()
    }
}

/// Feedback `feedback_id` under `event_id`, if the caller may change it.
async fn editable_feedback(
    state: &AppState,
    event_id: i32,
    feedback_id: i32,
    identity: &Identity,
) -> Result<Feedback, ApiError> {
    let feedback = Feedback::get_by_id(&state.pool, feedback_id)
        .await?
        .filter(|f| f.event_id == event_id)
        .ok_or_else(|| ApiError::not_found(format!("Feedback not found: {}", feedback_id)))?;

    if !identity.owns_or_admin(feedback.user_id) {
        tracing::warn!("User {} denied access to feedback {}", identity.id, feedback_id);
        return Err(AuthError::AccessDenied.into());
    }
    Ok(feedback)
}

/// POST /events/:id/feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<i32>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(body): ValidatedJson<FeedbackRequest>,
) -> ApiResult<Feedback> {
    let feedback = Feedback::create(&state.pool, body.content.trim(), event_id, identity.id).await?;
    Ok(ApiResponse::created(feedback))
}

/// PATCH /events/:id/feedback/:feedback_id
pub async fn update_feedback(
    State(state): State<AppState>,
    ApiPath((event_id, feedback_id)): ApiPath<(i32, i32)>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(body): ValidatedJson<UpdateFeedbackRequest>,
) -> ApiResult<Feedback> {
    editable_feedback(&state, event_id, feedback_id, &identity).await?;

    let mut fields = FieldMap::new();
    fields.insert_some("content", body.content.map(|c| c.trim().to_string()));
    let update = sql_for_partial_update(&fields, FEEDBACK_COLUMNS)?;

    let feedback = Feedback::update(&state.pool, feedback_id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Feedback not found: {}", feedback_id)))?;
    Ok(ApiResponse::success(feedback))
}

/// DELETE /events/:id/feedback/:feedback_id
pub async fn delete_feedback(
    State(state): State<AppState>,
    ApiPath((event_id, feedback_id)): ApiPath<(i32, i32)>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    editable_feedback(&state, event_id, feedback_id, &identity).await?;

    if !Feedback::delete(&state.pool, feedback_id).await? {
        return Err(ApiError::not_found(format!("Feedback not found: {}", feedback_id)));
    }
    Ok(ApiResponse::success(json!({ "message": "Feedback deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_feedback_is_invalid() {
        let body: FeedbackRequest = serde_json::from_str(r#"{"content": "   "}"#).unwrap();
        assert!(body.validate().is_err());

        let body: FeedbackRequest = serde_json::from_str("{}").unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn update_without_content_compiles_to_empty_update() {
        let body: UpdateFeedbackRequest = serde_json::from_str("{}").unwrap();
        assert!(body.validate().is_ok());

        let mut fields = FieldMap::new();
        fields.insert_some("content", body.content);
        let err = ApiError::from(sql_for_partial_update(&fields, FEEDBACK_COLUMNS).unwrap_err());
        assert_eq!(err.status_code(), 400);
    }
}
