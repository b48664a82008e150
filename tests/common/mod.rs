#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use jobly_api::auth::{generate_jwt, Claims};
use jobly_api::database::SCHEMA_SQL;
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::Executor;

pub const SECRET_KEY: &str = "integration-secret";

static SCHEMA: Lazy<tokio::sync::OnceCell<()>> = Lazy::new(tokio::sync::OnceCell::new);
static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Environment is inherited so the server sees TEST_DATABASE_URL.
        // A single pooled connection makes every request reuse one session.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobly-api"));
        cmd.env("PORT", port.to_string())
            .env("APP_ENV", "test")
            .env("SECRET_KEY", SECRET_KEY)
            .env("DATABASE_MAX_CONNECTIONS", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Server backed by the test database, or `None` when TEST_DATABASE_URL
/// is unset and the suite should be skipped. The process is killed when
/// the returned handle drops.
pub async fn ensure_server() -> Result<Option<TestServer>> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return Ok(None);
    };

    SCHEMA
        .get_or_try_init(|| async {
            let pool = sqlx::PgPool::connect(&database_url).await?;
            pool.execute(SCHEMA_SQL).await?;
            pool.close().await;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

pub fn admin_token() -> String {
    token("admin", true)
}

pub fn user_token() -> String {
    token("u1", false)
}

fn token(username: &str, is_admin: bool) -> String {
    generate_jwt(&Claims::new(username, is_admin, 1), SECRET_KEY).expect("sign test token")
}

/// Lowercase identifier unique across test processes and threads
pub fn unique(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{}x{}", prefix, std::process::id() % 100_000, n)
}

/// Create a company through the API and return its handle
pub async fn create_company(server: &TestServer, client: &reqwest::Client, num_employees: i64) -> Result<String> {
    let handle = unique("c");
    let res = client
        .post(server.url("/companies"))
        .bearer_auth(admin_token())
        .json(&json!({
            "handle": handle,
            "name": format!("Company {}", handle),
            "description": "integration",
            "numEmployees": num_employees,
            "logoUrl": format!("http://{}.img", handle)
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create company: {}", res.status());
    Ok(handle)
}

/// Create a job through the API and return its body
pub async fn create_job(server: &TestServer, client: &reqwest::Client, body: Value) -> Result<Value> {
    let res = client
        .post(server.url("/jobs"))
        .bearer_auth(admin_token())
        .json(&body)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create job: {}", res.status());
    Ok(res.json::<Value>().await?["job"].clone())
}
