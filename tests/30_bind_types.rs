//! The server runs with a single pooled connection, so these requests share
//! one Postgres session and send the same statement text with a different
//! JSON kind in the same parameter slot.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn job_insert_accepts_null_then_fractional_equity() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 5).await?;

    let first = common::create_job(&server, &client, json!({ "title": "No equity", "companyHandle": handle })).await?;
    assert_eq!(first["equity"], Value::Null);
    assert_eq!(first["salary"], Value::Null);

    let second = common::create_job(
        &server,
        &client,
        json!({ "title": "Some equity", "salary": 50000, "equity": 0.05, "companyHandle": handle }),
    )
    .await?;
    assert_eq!(second["equity"], json!(0.05));
    assert_eq!(second["salary"], json!(50000));

    Ok(())
}

#[tokio::test]
async fn job_update_accepts_integer_then_fractional_equity() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 5).await?;
    let job = common::create_job(&server, &client, json!({ "title": "Shares", "companyHandle": handle })).await?;
    let url = server.url(&format!("/jobs/{}", job["id"]));

    for (equity, expected) in [(json!(0), json!(0.0)), (json!(0.25), json!(0.25)), (Value::Null, Value::Null)] {
        let res = client
            .patch(&url)
            .bearer_auth(common::admin_token())
            .json(&json!({ "equity": equity }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "equity {}", equity);
        assert_eq!(res.json::<Value>().await?["job"]["equity"], expected);
    }

    Ok(())
}

#[tokio::test]
async fn company_update_accepts_null_then_text() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 5).await?;
    let url = server.url(&format!("/companies/{}", handle));

    let res = client
        .patch(&url)
        .bearer_auth(common::admin_token())
        .json(&json!({ "logoUrl": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["company"]["logoUrl"], Value::Null);

    let res = client
        .patch(&url)
        .bearer_auth(common::admin_token())
        .json(&json!({ "logoUrl": "http://new.img" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["company"]["logoUrl"], "http://new.img");

    Ok(())
}
