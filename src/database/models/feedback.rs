use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::sql::{bind_value, ColumnMapping, PartialUpdate};

/// Feedback payload keys already match their columns.
pub const FEEDBACK_COLUMNS: &ColumnMapping = &[];

const FEEDBACK_FIELDS: &str = "id, content, event_id, user_id, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i32,
    pub content: String,
    pub event_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub async fn create(pool: &PgPool, content: &str, event_id: i32, user_id: i32) -> Result<Feedback, DatabaseError> {
        let sql = format!(
            "INSERT INTO feedback (content, event_id, user_id) VALUES ($1, $2, $3) RETURNING {}",
            FEEDBACK_FIELDS
        );

        sqlx::query_as::<_, Feedback>(&sql)
            .bind(content)
            .bind(event_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                DatabaseError::NotFound(_) => DatabaseError::NotFound(format!("Event not found: {}", event_id)),
                other => other,
            })
    }

    pub async fn by_event(pool: &PgPool, event_id: i32) -> Result<Vec<Feedback>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM feedback WHERE event_id = $1 ORDER BY created_at DESC, id DESC",
            FEEDBACK_FIELDS
        );
        Ok(sqlx::query_as::<_, Feedback>(&sql).bind(event_id).fetch_all(pool).await?)
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Feedback>, DatabaseError> {
        let sql = format!("SELECT {} FROM feedback WHERE id = $1", FEEDBACK_FIELDS);
        Ok(sqlx::query_as::<_, Feedback>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn update(pool: &PgPool, id: i32, update: &PartialUpdate) -> Result<Option<Feedback>, DatabaseError> {
        let sql = format!(
            "UPDATE feedback SET {} WHERE id = ${} RETURNING {}",
            update.set_cols,
            update.next_placeholder(),
            FEEDBACK_FIELDS
        );

        let mut q = sqlx::query_as::<_, Feedback>(&sql);
        for value in &update.values {
            q = bind_value(q, value);
        }
        Ok(q.bind(id).fetch_optional(pool).await?)
    }

    /// Returns false when no row matched.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM feedback WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
