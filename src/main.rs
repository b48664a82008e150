#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();
    jobly_api::server::init_tracing();

    let config = jobly_api::config::config();
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);

    jobly_api::server::run(None).await
}
