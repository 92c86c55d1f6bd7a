mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_login_and_whoami() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = format!("auth-{}@example.com", uuid::Uuid::new_v4());

    // Register
    let res = client
        .post(format!("{}/api/users/register", server.base_url))
        .json(&json!({ "name": "Alice", "email": email, "password": "hunter22" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["token"].as_str().is_some());
    // password hash must never leak
    assert!(body["data"].get("password_hash").is_none());

    // Login
    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "email": email, "password": "hunter22" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let token = body["token"].as_str().unwrap().to_string();

    // Me
    let res = client
        .get(format!("{}/api/users/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["email"], email.as_str());

    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_400() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let email = format!("dup-{}@example.com", uuid::Uuid::new_v4());
    let payload = json!({ "name": "Bob", "email": email, "password": "hunter22" });

    let res = client
        .post(format!("{}/api/users/register", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/api/users/register", server.base_url))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);

    Ok(())
}

#[tokio::test]
async fn wrong_password_is_a_401() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (_, email) = common::register_user(&server.base_url).await?;

    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/users/me",
        "/api/organizations",
        "/api/customers",
        "/api/expenses",
        "/api/expenses/summary",
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );
    }

    Ok(())
}
