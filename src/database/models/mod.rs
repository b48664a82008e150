pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyJob, CompanyRepository, NewCompany};
pub use job::{Job, JobRepository, NewJob};

use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::filter::FilterError;

/// Failures surfaced by the entity repositories
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("No data")]
    EmptyUpdate,

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<FilterError> for ModelError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::EmptyUpdate => ModelError::EmptyUpdate,
            FilterError::InvalidColumn(column) => ModelError::InvalidField(column),
        }
    }
}
