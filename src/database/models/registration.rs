use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
}

/// A user signed up for a given event.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrant {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// An event a given user signed up for.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub event_title: String,
    pub event_date: NaiveDate,
}

impl Registration {
    pub async fn register(pool: &PgPool, event_id: i32, user_id: i32) -> Result<Registration, DatabaseError> {
        sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (event_id, user_id)
             VALUES ($1, $2)
             RETURNING id, event_id, user_id",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Conflict(_) => DatabaseError::Conflict("Already registered for this event".to_string()),
            DatabaseError::NotFound(_) => DatabaseError::NotFound(format!("Event not found: {}", event_id)),
            other => other,
        })
    }

    pub async fn by_event(pool: &PgPool, event_id: i32) -> Result<Vec<EventRegistrant>, DatabaseError> {
        Ok(sqlx::query_as::<_, EventRegistrant>(
            "SELECT r.id, r.event_id, r.user_id, u.first_name, u.last_name, u.email
             FROM registrations r
             JOIN users u ON r.user_id = u.id
             WHERE r.event_id = $1
             ORDER BY u.last_name, u.first_name",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await?)
    }

    pub async fn by_user(pool: &PgPool, user_id: i32) -> Result<Vec<UserRegistration>, DatabaseError> {
        Ok(sqlx::query_as::<_, UserRegistration>(
            "SELECT r.id, r.event_id, r.user_id, e.title AS event_title, e.event_date
             FROM registrations r
             JOIN events e ON r.event_id = e.id
             WHERE r.user_id = $1
             ORDER BY e.event_date, e.event_time",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?)
    }

    pub async fn is_registered(pool: &PgPool, event_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE event_id = $1 AND user_id = $2)",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Returns false when there was nothing to remove.
    pub async fn unregister(pool: &PgPool, event_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
