// handlers/public/system.rs - Service banner and health probe

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::database::manager;
use crate::state::AppState;

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Ahiska API",
            "version": version,
            "environment": format!("{:?}", state.config.environment),
            "description": "Community events backend built with Rust (Axum)",
            "endpoints": {
                "auth": "/auth/register, /auth/login, /auth/logout (public)",
                "users": "/users/:id[/registrations] (self or admin)",
                "events": "/events[/:id] (public reads, admin writes)",
                "registrations": "/events/:id/register, /events/:id/registrations",
                "feedback": "/events/:id/feedback[/:feedback_id]",
                "q_and_a": "/q_and_a[/:id[/answer]]",
                "admin": "/admin/* (admin only)",
                "health": "/health (public)",
            }
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
