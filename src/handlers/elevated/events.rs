// handlers/elevated/events.rs - Event management (admin only)

use axum::{
    extract::State,
    Extension,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::validate::{nullable, time_of_day};
use crate::api::{ApiPath, FieldErrors, Validate, ValidatedJson};
use crate::auth::Identity;
use crate::database::models::{Event, NewEvent, EVENT_COLUMNS};
use crate::database::{sql_for_partial_update, FieldMap};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(deserialize_with = "time_of_day::deserialize")]
    pub time: NaiveTime,
    pub location: String,
}

impl Validate for CreateEventRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.text("title", &self.title, 1, 200);
        errors.text("location", &self.location, 1, 255);
        if let Some(description) = &self.description {
            errors.text("description", description, 0, 5000);
        }
        errors.into_result()
    }
}

/// Event fields an admin may change. `createdBy` is fixed at creation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "time_of_day::option::deserialize")]
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
}

impl Validate for UpdateEventRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            errors.text("title", title, 1, 200);
        }
        if let Some(location) = &self.location {
            errors.text("location", location, 1, 255);
        }
        if let Some(Some(description)) = &self.description {
            errors.text("description", description, 0, 5000);
        }
        errors.into_result()
    }
}

impl UpdateEventRequest {
    fn into_fields(self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert_some("title", self.title.map(|v| v.trim().to_string()));
        fields.insert_some("description", self.description);
        fields.insert_some("date", self.date);
        fields.insert_some("time", self.time);
        fields.insert_some("location", self.location.map(|v| v.trim().to_string()));
        fields
    }
}

/// POST /events - the creator is the verified caller.
pub async fn create_event(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(body): ValidatedJson<CreateEventRequest>,
) -> ApiResult<Event> {
    let event = Event::create(
        &state.pool,
        NewEvent {
            title: body.title.trim(),
            description: body.description.as_deref(),
            date: body.date,
            time: body.time,
            location: body.location.trim(),
            created_by: identity.id,
        },
    )
    .await?;

    tracing::info!("Admin {} created event {}", identity.id, event.id);
    Ok(ApiResponse::created(event))
}

/// PATCH /events/:id
pub async fn update_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(body): ValidatedJson<UpdateEventRequest>,
) -> ApiResult<Event> {
    let update = sql_for_partial_update(&body.into_fields(), EVENT_COLUMNS)?;

    let event = Event::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Event not found: {}", id)))?;
    Ok(ApiResponse::success(event))
}

/// DELETE /events/:id (also served at /admin/events/:id)
pub async fn delete_event(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> ApiResult<Value> {
    Event::delete(&state.pool, id).await?;
    tracing::info!("Deleted event {}", id);
    Ok(ApiResponse::success(json!({ "message": "Event deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqlValue;

    #[test]
    fn create_accepts_short_time() {
        let body: CreateEventRequest = serde_json::from_str(
            r#"{"title": "Picnic", "date": "2026-06-01", "time": "12:00", "location": "Park"}"#,
        )
        .unwrap();
        assert_eq!(body.time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn create_rejects_bad_date() {
        let parsed = serde_json::from_str::<CreateEventRequest>(
            r#"{"title": "Picnic", "date": "June 1st", "time": "12:00", "location": "Park"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn update_maps_date_and_time_columns() {
        let body: UpdateEventRequest = serde_json::from_str(r#"{"time": "19:15", "date": "2026-06-02"}"#).unwrap();
        let update = sql_for_partial_update(&body.into_fields(), EVENT_COLUMNS).unwrap();

        assert_eq!(update.set_cols, r#""event_date" = $1, "event_time" = $2"#);
        assert_eq!(
            update.values,
            vec![
                SqlValue::Date(NaiveDate::from_ymd_opt(2026, 6, 2).unwrap()),
                SqlValue::Time(NaiveTime::from_hms_opt(19, 15, 0).unwrap()),
            ]
        );
        assert_eq!(update.next_placeholder(), 3);
    }

    #[test]
    fn description_can_be_cleared() {
        let body: UpdateEventRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let update = sql_for_partial_update(&body.into_fields(), EVENT_COLUMNS).unwrap();
        assert_eq!(update.set_cols, r#""description" = $1"#);
        assert_eq!(update.values, vec![SqlValue::Null]);
    }

    #[test]
    fn date_and_time_cannot_be_nulled() {
        let body: UpdateEventRequest = serde_json::from_str(r#"{"date": null, "time": null}"#).unwrap();
        assert!(body.into_fields().is_empty());
    }

    #[test]
    fn created_by_is_not_updatable() {
        assert!(serde_json::from_str::<UpdateEventRequest>(r#"{"createdBy": 2}"#).is_err());
        assert!(serde_json::from_str::<UpdateEventRequest>(r#"{"created_by": 2}"#).is_err());
    }
}
