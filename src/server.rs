use anyhow::Context;
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::config::{self, SecurityConfig};
use crate::database::models::{CompanyRepository, JobRepository};
use crate::database::{DatabaseManager, QueryExecutor};
use crate::handlers::{companies, jobs, root};
use crate::middleware::authenticate_jwt;

/// Shared handler state; the executor is the only dependency.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn QueryExecutor>,
}

impl AppState {
    pub fn new(db: Arc<dyn QueryExecutor>) -> Self {
        Self { db }
    }

    pub fn companies(&self) -> CompanyRepository {
        CompanyRepository::new(self.db.clone())
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.db.clone())
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root::root))
        .route("/health", get(root::health))
        .merge(company_routes())
        .merge(job_routes())
        // Global middleware
        .layer(from_fn(authenticate_jwt))
        .layer(cors_layer(&config::config().security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/:handle",
            get(companies::get)
                .patch(companies::update)
                .delete(companies::remove),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/jobs/:id",
            get(jobs::get).patch(jobs::update).delete(jobs::remove),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Install the global subscriber; `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Connect to the database and serve until the process is stopped.
pub async fn run(port_override: Option<u16>) -> anyhow::Result<()> {
    let config = config::config();
    config.log_summary();

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database pool")?;
    let state = AppState::new(Arc::new(pool));

    let port = port_override.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Jobly API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
