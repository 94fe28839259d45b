//! User management routes (admin only)

use crate::auth::{require_role, AuthUser, Role};
use crate::error::ApiResult;
use crate::repositories::UserRecord;
use crate::services::{CreateUserInput, UpdateUserInput, UserService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ListResponse, Pagination};

const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Create user routes; every verb is admin-gated
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ADMIN_ONLY, req, next)
        }))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub fullname: String,
    pub email: String,
    pub role: Role,
    pub password: Option<String>,
}

/// User representation; the password hash never leaves the service
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            fullname: record.fullname,
            email: record.email,
            role: record.role,
            created_by: record.created_by,
            modified_by: record.modified_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn create_user(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = UserService::create(
        state.db(),
        &actor,
        CreateUserInput {
            username: req.username,
            fullname: req.fullname,
            email: req.email,
            password: req.password,
            role: req.role,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<ListResponse<UserResponse>>> {
    let params = pagination.normalize();
    let (records, total) = UserService::list(state.db(), params.limit, params.offset).await?;
    let items = records.into_iter().map(UserResponse::from).collect();
    Ok(Json(ListResponse::new(items, total, params)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::get(state.db(), id).await?;
    Ok(Json(user.into()))
}

async fn update_user(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = UserService::update(
        state.db(),
        &actor,
        id,
        UpdateUserInput {
            fullname: req.fullname,
            email: req.email,
            role: req.role,
            password: req.password,
        },
    )
    .await?;
    Ok(Json(user.into()))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    UserService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
