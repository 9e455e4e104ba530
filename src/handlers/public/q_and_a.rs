// handlers/public/q_and_a.rs - Question board reads

use axum::extract::State;

use crate::api::ApiPath;
use crate::database::models::Question;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /q_and_a - newest question first, answers oldest first.
pub async fn list_questions(State(state): State<AppState>) -> ApiResult<Vec<Question>> {
    Ok(ApiResponse::success(Question::get_all(&state.pool).await?))
}

/// GET /q_and_a/:id
pub async fn get_question(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> ApiResult<Question> {
    let question = Question::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No question found with ID: {}", id)))?;
    Ok(ApiResponse::success(question))
}
