mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn create_expense(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    item: &str,
    amount: f64,
    date: &str,
) -> Result<serde_json::Value> {
    let res = client
        .post(format!("{}/api/expenses", base_url))
        .bearer_auth(token)
        .json(&json!({ "item": item, "amount": amount, "date": date }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "create failed: {}",
        res.status()
    );
    Ok(res.json::<serde_json::Value>().await?)
}

#[tokio::test]
async fn list_paginates_and_filters() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(&server.base_url).await?;

    for i in 0..5 {
        create_expense(
            &client,
            &server.base_url,
            &token,
            &format!("widget {}", i),
            10.0 + i as f64,
            &format!("2024-03-0{}T12:00:00Z", i + 1),
        )
        .await?;
    }
    create_expense(
        &client,
        &server.base_url,
        &token,
        "coffee",
        3.5,
        "2024-03-10T08:00:00Z",
    )
    .await?;

    // Page 1 of 2 at limit 4
    let res = client
        .get(format!(
            "{}/api/expenses?page=1&limit=4",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["total"], 6);
    assert_eq!(body["count"], 4);
    assert_eq!(body["pagination"]["next"]["page"], 2);
    assert!(body["pagination"].get("prev").is_none());

    // Default sort is date descending
    let first_item = body["data"][0]["item"].as_str().unwrap();
    assert_eq!(first_item, "coffee");

    // Substring search
    let res = client
        .get(format!(
            "{}/api/expenses?itemSearch=COFFEE",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["total"], 1);

    // amountEquals wins over the bounds
    let res = client
        .get(format!(
            "{}/api/expenses?amountEquals=3.5&amountGreaterThan=100",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["item"], "coffee");

    // Explicit date range
    let res = client
        .get(format!(
            "{}/api/expenses?startDate=2024-03-01&endDate=2024-03-05",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["total"], 5);

    // Projection keeps id plus the selected fields
    let res = client
        .get(format!(
            "{}/api/expenses?select=item&limit=1",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let record = body["data"][0].as_object().unwrap();
    assert!(record.contains_key("id"));
    assert!(record.contains_key("item"));
    assert!(!record.contains_key("amount"));

    Ok(())
}

#[tokio::test]
async fn malformed_filter_values_are_rejected() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(&server.base_url).await?;

    for query in [
        "amountEquals=lots",
        "startDate=yesterday",
        "week=1", // missing year
        "month=13&year=2024",
        "user_id=11111111-1111-1111-1111-111111111111", // owner column
    ] {
        let res = client
            .get(format!("{}/api/expenses?{}", server.base_url, query))
            .bearer_auth(&token)
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            query
        );
    }

    // page/limit keep the lenient fallback
    let res = client
        .get(format!(
            "{}/api/expenses?page=first&limit=never",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn cross_user_access_reads_as_not_found() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (owner_token, _) = common::register_user(&server.base_url).await?;
    let (intruder_token, _) = common::register_user(&server.base_url).await?;

    let created = create_expense(
        &client,
        &server.base_url,
        &owner_token,
        "secret purchase",
        42.0,
        "2024-04-01T00:00:00Z",
    )
    .await?;
    let id = created["data"]["id"].as_str().unwrap();

    // Read, update, and delete must all answer 404 for the other user
    let res = client
        .get(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&intruder_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&intruder_token)
        .json(&json!({ "item": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&intruder_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner still sees the record untouched
    let res = client
        .get(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&owner_token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["item"], "secret purchase");

    Ok(())
}

#[tokio::test]
async fn malformed_id_is_indistinguishable_from_missing() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(&server.base_url).await?;

    let res = client
        .get(format!("{}/api/expenses/not-a-uuid", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Expense not found");

    Ok(())
}

#[tokio::test]
async fn update_and_delete_round_trip() -> Result<()> {
    if !common::test_env_ready() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let (token, _) = common::register_user(&server.base_url).await?;

    let created = create_expense(
        &client,
        &server.base_url,
        &token,
        "keyboard",
        120.0,
        "2024-04-02T00:00:00Z",
    )
    .await?;
    let id = created["data"]["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "amount": 99.0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["amount"], 99.0);
    // untouched fields survive a partial update
    assert_eq!(body["data"]["item"], "keyboard");

    let res = client
        .delete(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/expenses/{}", server.base_url, id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
