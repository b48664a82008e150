pub mod auth;
pub mod response;

pub use auth::{authenticate_jwt, AuthUser, CurrentUser, RequireAdmin, RequireLogin};
pub use response::{ApiResponse, ApiResult};
