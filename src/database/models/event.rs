use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::sql::{bind_value, ColumnMapping, PartialUpdate};

pub const EVENT_COLUMNS: &ColumnMapping = &[("date", "event_date"), ("time", "event_time")];

const EVENT_FIELDS: &str =
    "id, title, description, event_date AS date, event_time AS time, location, created_by";

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub created_by: Option<i32>,
}

pub struct NewEvent<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: &'a str,
    pub created_by: i32,
}

impl Event {
    pub async fn create(pool: &PgPool, event: NewEvent<'_>) -> Result<Event, DatabaseError> {
        let sql = format!(
            "INSERT INTO events (title, description, event_date, event_time, location, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            EVENT_FIELDS
        );

        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(event.title)
            .bind(event.description)
            .bind(event.date)
            .bind(event.time)
            .bind(event.location)
            .bind(event.created_by)
            .fetch_one(pool)
            .await?)
    }

    pub async fn get_all(pool: &PgPool) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!("SELECT {} FROM events ORDER BY event_date, event_time", EVENT_FIELDS);
        Ok(sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?)
    }

    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Event>, DatabaseError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_FIELDS);
        Ok(sqlx::query_as::<_, Event>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn update(pool: &PgPool, id: i32, update: &PartialUpdate) -> Result<Option<Event>, DatabaseError> {
        let sql = format!(
            "UPDATE events SET {} WHERE id = ${} RETURNING {}",
            update.set_cols,
            update.next_placeholder(),
            EVENT_FIELDS
        );

        let mut q = sqlx::query_as::<_, Event>(&sql);
        for value in &update.values {
            q = bind_value(q, value);
        }
        Ok(q.bind(id).fetch_optional(pool).await?)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), DatabaseError> {
        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM events WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        deleted
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("Event not found: {}", id)))
    }
}
