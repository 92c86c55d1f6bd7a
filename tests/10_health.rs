mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_database_status() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let payload = res.json::<serde_json::Value>().await?;
    assert!(payload["success"].as_bool().unwrap_or(false));
    assert_eq!(payload["data"]["database"], "ok");

    Ok(())
}

#[tokio::test]
async fn root_banner_lists_endpoints() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let payload = res.json::<serde_json::Value>().await?;
    assert!(payload["success"].as_bool().unwrap_or(false));
    assert!(payload["data"]["endpoints"]["expenses"].is_string());

    Ok(())
}
