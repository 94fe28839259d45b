//! Authentication and authorization middleware
//!
//! The auth gate runs on every protected route: it extracts the bearer
//! token, verifies it as access-class, and inserts a typed [`AuthUser`]
//! identity context into request extensions. The role gate is layered per
//! route on top of it and checks the context role against a static
//! allow-list. No downstream handler runs when either gate rejects.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use super::jwt::TokenClass;
use super::role::Role;

/// Request identity context established by the auth gate
///
/// Exists only for the lifetime of one request. Handlers consume it for
/// audit fields (created-by/modified-by) and ownership checks; once a
/// request reaches them these fields are present and trustworthy.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("authorization header is required".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization header format".to_string()))
}

/// Verify an access token and build the identity context.
///
/// The internal failure kind (bad signature, expired, wrong class) is
/// logged; the caller only sees a generic 401.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)?;

    let claims = state.jwt().verify(token, TokenClass::Access).map_err(|e| {
        debug!("Access token rejected: {}", e);
        ApiError::Unauthorized("invalid or expired access token".to_string())
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        username: claims.username,
        role: claims.role,
    })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // The auth gate normally runs first and leaves the context here
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers)
    }
}

/// Auth gate: apply to a router with `middleware::from_fn_with_state`
pub async fn auth_middleware(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Role gate: allow the request iff the context role is in `allowed`.
///
/// Wire per route with
/// `middleware::from_fn(|req, next| require_role(&[Role::Admin], req, next))`.
/// A missing identity context means the gate was mounted without the auth
/// gate upstream, which is a route-wiring bug, not a runtime condition.
pub async fn require_role(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request.extensions().get::<AuthUser>().ok_or_else(|| {
        ApiError::Configuration("role gate reached without identity context".to_string())
    })?;

    if allowed.contains(&user.role) {
        Ok(next.run(request).await)
    } else {
        debug!(role = %user.role, ?allowed, "Role not permitted for route");
        Err(ApiError::Forbidden("access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_requires_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(matches!(
            bearer_token(&headers),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn bearer_token_strips_prefix() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_scheme_is_case_sensitive() {
        let headers = headers_with_auth("bearer abc.def.ghi");
        assert!(bearer_token(&headers).is_err());
    }
}
