mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn job_lifecycle() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 10).await?;
    let job = common::create_job(
        &server,
        &client,
        json!({ "title": "Engineer", "salary": 100000, "equity": 0.05, "companyHandle": handle }),
    )
    .await?;
    let id = job["id"].as_i64().expect("job id");
    assert_eq!(job["equity"], json!(0.05));
    assert_eq!(job["companyHandle"], json!(handle));

    let res = client
        .patch(server.url(&format!("/jobs/{}", id)))
        .bearer_auth(common::admin_token())
        .json(&json!({ "salary": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["job"]["salary"], Value::Null);
    assert_eq!(body["job"]["title"], "Engineer");

    let res = client.get(server.url(&format!("/companies/{}", handle))).send().await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["company"]["jobs"][0]["id"], json!(id));

    let res = client
        .delete(server.url(&format!("/jobs/{}", id)))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url(&format!("/jobs/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn equity_filter_skips_zero_and_null() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 10).await?;
    let title = common::unique("eq");
    for equity in [Some(json!(0)), None, Some(json!(0.2))] {
        let mut body = json!({ "title": title, "salary": 10, "companyHandle": handle });
        if let Some(equity) = equity {
            body["equity"] = equity;
        }
        common::create_job(&server, &client, body).await?;
    }

    let res = client
        .get(server.url(&format!("/jobs?titleLike={}&hasEquity=true", title)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let jobs = body["jobs"].as_array().cloned().unwrap_or_default();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["equity"], json!(0.2));

    let res = client
        .get(server.url(&format!("/jobs?titleLike={}&hasEquity=false", title)))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["jobs"].as_array().map(Vec::len), Some(3), "false drops the filter");

    Ok(())
}

#[tokio::test]
async fn deleting_company_removes_its_jobs() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let handle = common::create_company(&server, &client, 1).await?;
    let job = common::create_job(&server, &client, json!({ "title": "Temp", "companyHandle": handle })).await?;

    client
        .delete(server.url(&format!("/companies/{}", handle)))
        .bearer_auth(common::admin_token())
        .send()
        .await?;

    let res = client.get(server.url(&format!("/jobs/{}", job["id"]))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn writes_require_admin() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/jobs"))
        .bearer_auth(common::user_token())
        .json(&json!({ "title": "x", "companyHandle": "c1" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": { "message": "Requires admin", "status": 401 } })
    );

    Ok(())
}
