use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("No data")]
    EmptyUpdate,

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}
