pub mod executor;
pub mod manager;
pub mod models;
pub mod repository;

pub use executor::{QueryExecutor, Row};
pub use manager::{DatabaseError, DatabaseManager};
pub use models::ModelError;

/// Tables for companies and jobs; jobs reference their company by handle.
pub const SCHEMA_SQL: &str = include_str!("../../sql/jobly-schema.sql");
