pub mod types;
pub mod filter_where;
pub mod partial_update;
pub mod error;

pub use types::*;
pub use error::FilterError;
pub use filter_where::{build_where_clause, FilterWhere};
pub use partial_update::build_set_clause;
