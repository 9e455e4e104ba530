use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;

const QUESTION_SELECT: &str = "SELECT q.id, q.question, q.asked_by, q.created_at,
            u.first_name AS asked_by_first_name, u.last_name AS asked_by_last_name
     FROM q_and_a q
     JOIN users u ON q.asked_by = u.id";

const ANSWER_SELECT: &str = "SELECT a.id, a.question_id, a.answer, a.answered_by, a.answered_at,
            u.first_name AS answered_by_first_name, u.last_name AS answered_by_last_name
     FROM answers a
     JOIN users u ON a.answered_by = u.id";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub asked_by: i32,
    pub created_at: DateTime<Utc>,
    pub asked_by_first_name: String,
    pub asked_by_last_name: String,
    #[sqlx(skip)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub answer: String,
    pub answered_by: i32,
    pub answered_at: DateTime<Utc>,
    pub answered_by_first_name: String,
    pub answered_by_last_name: String,
}

impl Question {
    /// New question with asker names and an empty answer list.
    pub async fn create(pool: &PgPool, question: &str, asked_by: i32) -> Result<Question, DatabaseError> {
        let created = sqlx::query_as::<_, Question>(
            "WITH q AS (
                INSERT INTO q_and_a (question, asked_by)
                VALUES ($1, $2)
                RETURNING id, question, asked_by, created_at
             )
             SELECT q.id, q.question, q.asked_by, q.created_at,
                    u.first_name AS asked_by_first_name, u.last_name AS asked_by_last_name
             FROM q
             JOIN users u ON q.asked_by = u.id",
        )
        .bind(question)
        .bind(asked_by)
        .fetch_optional(pool)
        .await?;

        // The CTE join only comes back empty when the asker row is gone.
        created.ok_or_else(|| DatabaseError::NotFound(format!("No user found with ID: {}", asked_by)))
    }

    /// Append an answer and return the question's full answer list.
    pub async fn answer(pool: &PgPool, question_id: i32, answer: &str, user_id: i32) -> Result<Vec<Answer>, DatabaseError> {
        sqlx::query("INSERT INTO answers (answer, question_id, answered_by) VALUES ($1, $2, $3)")
            .bind(answer)
            .bind(question_id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::NotFound(_) => DatabaseError::NotFound(format!("Question not found: {}", question_id)),
                other => other,
            })?;

        Self::answers_for(pool, question_id).await
    }

    async fn answers_for(pool: &PgPool, question_id: i32) -> Result<Vec<Answer>, DatabaseError> {
        let sql = format!("{} WHERE a.question_id = $1 ORDER BY a.answered_at ASC, a.id ASC", ANSWER_SELECT);
        Ok(sqlx::query_as::<_, Answer>(&sql).bind(question_id).fetch_all(pool).await?)
    }

    /// Every question, newest first, each with its answers oldest first.
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Question>, DatabaseError> {
        let sql = format!("{} ORDER BY q.created_at DESC, q.id DESC", QUESTION_SELECT);
        let mut questions = sqlx::query_as::<_, Question>(&sql).fetch_all(pool).await?;

        let sql = format!("{} ORDER BY a.answered_at ASC, a.id ASC", ANSWER_SELECT);
        let answers = sqlx::query_as::<_, Answer>(&sql).fetch_all(pool).await?;

        attach_answers(&mut questions, answers);
        Ok(questions)
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Question>, DatabaseError> {
        let sql = format!("{} WHERE q.id = $1", QUESTION_SELECT);
        let Some(mut question) = sqlx::query_as::<_, Question>(&sql).bind(id).fetch_optional(pool).await? else {
            return Ok(None);
        };

        question.answers = Self::answers_for(pool, id).await?;
        Ok(Some(question))
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM q_and_a WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("No question found with ID: {}", id)));
        }
        Ok(())
    }
}

/// Distribute answers onto their questions, keeping answer order.
fn attach_answers(questions: &mut [Question], answers: Vec<Answer>) {
    let mut grouped: HashMap<i32, Vec<Answer>> = HashMap::new();
    for answer in answers {
        grouped.entry(answer.question_id).or_default().push(answer);
    }
    for question in questions.iter_mut() {
        question.answers = grouped.remove(&question.id).unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i32) -> Question {
        Question {
            id,
            question: format!("q{}", id),
            asked_by: 1,
            created_at: Utc::now(),
            asked_by_first_name: "Ada".to_string(),
            asked_by_last_name: "Lovelace".to_string(),
            answers: vec![],
        }
    }

    fn answer(id: i32, question_id: i32) -> Answer {
        Answer {
            id,
            question_id,
            answer: format!("a{}", id),
            answered_by: 2,
            answered_at: Utc::now(),
            answered_by_first_name: "Alan".to_string(),
            answered_by_last_name: "Turing".to_string(),
        }
    }

    #[test]
    fn attaches_answers_in_order() {
        let mut questions = vec![question(1), question(2), question(3)];
        attach_answers(&mut questions, vec![answer(10, 2), answer(11, 1), answer(12, 2)]);

        assert_eq!(questions[0].answers.iter().map(|a| a.id).collect::<Vec<_>>(), vec![11]);
        assert_eq!(questions[1].answers.iter().map(|a| a.id).collect::<Vec<_>>(), vec![10, 12]);
        assert!(questions[2].answers.is_empty());
    }

    #[test]
    fn serializes_answers_inline() {
        let mut q = question(1);
        q.answers.push(answer(5, 1));
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["askedByFirstName"], "Ada");
        assert_eq!(value["answers"][0]["answeredByLastName"], "Turing");
    }
}
