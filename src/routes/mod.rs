//! Route definitions for the CMS API
//!
//! Public routes: login, refresh-token, health probes. Everything under
//! `/api` sits behind the auth gate; role gates are layered per route.

use crate::auth::auth_middleware;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod category;
mod health;
mod media;
mod post;
mod user;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod role_tests;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/user", user::user_routes())
        .nest("/category", category::category_routes())
        .nest("/post", post::post_routes())
        .nest("/media", media::media_routes())
        // Auth gate: sole entry point that establishes request identity
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh_token))
        .nest("/api", protected)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pagination query parameters (?page=1&limit=10)
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    const DEFAULT_LIMIT: i64 = 10;
    const MAX_LIMIT: i64 = 100;

    /// Clamp to sane bounds and compute the row offset
    pub fn normalize(&self) -> PageParams {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        PageParams {
            page,
            limit,
            offset: page.saturating_sub(1).saturating_mul(limit),
        }
    }
}

/// Normalized pagination
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Paginated list envelope
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let params = Pagination { page: None, limit: None }.normalize();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let params = Pagination { page: Some(0), limit: Some(1000) }.normalize();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 100);

        let params = Pagination { page: Some(3), limit: Some(20) }.normalize();
        assert_eq!(params.offset, 40);

        let params = Pagination { page: Some(i64::MAX), limit: Some(100) }.normalize();
        assert_eq!(params.limit, 100);
        assert_eq!(params.offset, i64::MAX);
    }
}
