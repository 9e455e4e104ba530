// handlers/protected/q_and_a.rs - Asking, answering and removing questions

use axum::{
    extract::State,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiPath, FieldErrors, Validate, ValidatedJson};
use crate::auth::Identity;
use crate::database::models::{Answer, Question};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: String,
}

impl Validate for QuestionRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.text("question", &self.question, 1, 1000);
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

impl Validate for AnswerRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.text("answer", &self.answer, 1, 2000);
        errors.into_result()
    }
}

/// POST /q_and_a
pub async fn ask_question(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(body): ValidatedJson<QuestionRequest>,
) -> ApiResult<Question> {
    let question = Question::create(&state.pool, body.question.trim(), identity.id).await?;
    Ok(ApiResponse::created(question))
}

/// PATCH /q_and_a/:id/answer - returns every answer on the question.
pub async fn answer_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(body): ValidatedJson<AnswerRequest>,
) -> ApiResult<Vec<Answer>> {
    let answers = Question::answer(&state.pool, id, body.answer.trim(), identity.id).await?;
    Ok(ApiResponse::success(answers))
}

/// DELETE /q_and_a/:id - asker or admin.
pub async fn delete_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Value> {
    let question = Question::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No question found with ID: {}", id)))?;

    if !identity.owns_or_admin(question.asked_by) {
        tracing::warn!("User {} denied deleting question {}", identity.id, id);
        return Err(AuthError::AccessDenied.into());
    }

    Question::delete(&state.pool, id).await?;
    Ok(ApiResponse::success(json!({ "message": "Question deleted" })))
}
