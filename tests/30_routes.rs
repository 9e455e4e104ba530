mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use ahiska_api::app;
use ahiska_api::auth::Role;

use common::{offline_state, send, token_for};

#[tokio::test]
async fn profile_requires_credential() {
    let app = app(offline_state());

    let (status, body) = send(&app, Method::GET, "/users/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Please log in");
}

#[tokio::test]
async fn profile_of_another_user_is_denied() {
    let state = offline_state();
    let token = token_for(&state, 1, Role::User);
    let app = app(state);

    let (status, body) = send(&app, Method::GET, "/users/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied");

    let (status, _) = send(&app, Method::GET, "/users/2/registrations", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let mut other = offline_state();
    other.keys = std::sync::Arc::new(ahiska_api::auth::TokenKeys::new("some-other-secret", None));
    let forged = token_for(&other, 1, Role::Admin);
    let app = app(offline_state());

    let (status, body) = send(&app, Method::GET, "/admin/users", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Please log in");
}

#[tokio::test]
async fn event_writes_need_admin() {
    let state = offline_state();
    let token = token_for(&state, 4, Role::User);
    let app = app(state);

    let event = json!({"title": "Picnic", "date": "2026-06-01", "time": "12:00", "location": "Park"});
    let (status, body) = send(&app, Method::POST, "/events", Some(&token), Some(event)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Admin privileges required");

    let (status, _) = send(&app, Method::DELETE, "/events/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/events/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_profile_update_is_a_client_error() {
    let state = offline_state();
    let token = token_for(&state, 3, Role::User);
    let app = app(state);

    let (status, body) = send(&app, Method::PATCH, "/users/3", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No data.");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn role_cannot_be_patched_through_profile() {
    let state = offline_state();
    let token = token_for(&state, 3, Role::User);
    let app = app(state);

    let (status, body) = send(&app, Method::PATCH, "/users/3", Some(&token), Some(json!({"role": "admin"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
}

#[tokio::test]
async fn invalid_event_patch_is_rejected_before_storage() {
    let state = offline_state();
    let token = token_for(&state, 1, Role::Admin);
    let app = app(state);

    let (status, _) = send(&app, Method::PATCH, "/events/1", Some(&token), Some(json!({"time": "noon"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PATCH, "/events/1", Some(&token), Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["title"].is_string());

    let (status, body) = send(&app, Method::PATCH, "/events/1", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No data.");
}

#[tokio::test]
async fn admin_input_errors() {
    let state = offline_state();
    let token = token_for(&state, 1, Role::Admin);
    let app = app(state);

    let (status, body) = send(&app, Method::GET, "/admin/users/search?query=", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Search query is required");

    let (status, _) = send(&app, Method::GET, "/admin/users/search", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PATCH, "/admin/users/2/role", Some(&token), Some(json!({"role": "root"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["role"].is_string());
}

#[tokio::test]
async fn registration_payload_is_validated() {
    let app = app(offline_state());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"firstName": "Ada", "lastName": "", "email": "ada", "password": "short"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["lastName", "email", "password"] {
        assert!(body["field_errors"][field].is_string(), "missing {}: {}", field, body);
    }
}

#[tokio::test]
async fn writes_need_credentials() {
    let app = app(offline_state());

    for (method, uri) in [
        (Method::POST, "/events/1/register"),
        (Method::DELETE, "/events/1/register"),
        (Method::POST, "/events/1/feedback"),
        (Method::PATCH, "/events/1/feedback/2"),
        (Method::DELETE, "/events/1/feedback/2"),
        (Method::POST, "/q_and_a"),
        (Method::PATCH, "/q_and_a/1/answer"),
        (Method::DELETE, "/q_and_a/1"),
        (Method::GET, "/admin/events"),
        (Method::DELETE, "/admin/feedback/1"),
    ] {
        let (status, _) = send(&app, method.clone(), uri, None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() {
    let app = app(offline_state());

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn logout_is_stateless() {
    let app = app(offline_state());

    let (status, body) = send(&app, Method::POST, "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn non_numeric_ids_use_error_envelope() {
    let state = offline_state();
    let admin = token_for(&state, 1, Role::Admin);
    let app = app(state);

    for (method, uri, token) in [
        (Method::GET, "/events/abc", None),
        (Method::GET, "/q_and_a/abc", None),
        (Method::GET, "/events/abc/registrations", None),
        (Method::GET, "/users/abc", Some(admin.as_str())),
        (Method::DELETE, "/admin/events/abc", Some(admin.as_str())),
        (Method::DELETE, "/events/1/feedback/xyz", Some(admin.as_str())),
    ] {
        let (status, body) = send(&app, method.clone(), uri, token, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["success"], false, "{} {}", method, uri);
        assert_eq!(body["error"], true, "{} {}", method, uri);
        assert_eq!(body["code"], "BAD_REQUEST", "{} {}", method, uri);
    }
}
