use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_jwt, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Request extension set by [`authenticate_jwt`]; `None` for anonymous requests.
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

/// Reads a bearer token when one is present. A missing or invalid token
/// leaves the request anonymous; the route guards decide what that means.
pub async fn authenticate_jwt(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let user = extract_jwt_from_headers(&headers).and_then(|token| {
        match verify_jwt(token, &config::config().security.secret_key) {
            Ok(claims) => Some(AuthUser::from(claims)),
            Err(e) => {
                tracing::debug!("Ignoring token: {}", e);
                None
            }
        }
    });

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Guard: any logged-in user
#[derive(Debug, Clone)]
pub struct RequireLogin(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireLogin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(CurrentUser(Some(user))) => Ok(RequireLogin(user.clone())),
            _ => Err(ApiError::unauthorized("Must be logged in")),
        }
    }
}

/// Guard: logged in with the admin flag
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireLogin(user) = RequireLogin::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::unauthorized("Requires admin"));
        }
        Ok(RequireAdmin(user))
    }
}
