mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_without_fields_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false, "should be false for error response");
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string(), "missing email error: {}", body);
    assert!(body["field_errors"]["password"].is_string(), "missing password error: {}", body);
    Ok(())
}

#[tokio::test]
async fn login_without_body_is_a_client_error() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .send()
        .await?;

    assert!(res.status().is_client_error(), "expected client error, got {}", res.status());
    Ok(())
}
