//! Post routes
//!
//! Create/update are open to all three roles (author ownership is
//! enforced in the service), delete is gated to admin and editor, reads
//! are open to any authenticated role.

use crate::auth::{require_role, AuthUser, Role};
use crate::error::ApiResult;
use crate::repositories::PostRecord;
use crate::services::{CreatePostInput, PostService, UpdatePostInput};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ListResponse, Pagination};

const ADMIN_EDITOR: &[Role] = &[Role::Admin, Role::Editor];
const ALL_ROLES: &[Role] = &[Role::Admin, Role::Editor, Role::Author];

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    let writes = Router::new()
        .route("/", post(create_post))
        .route("/:id", put(update_post))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ALL_ROLES, req, next)
        }));

    let deletes = Router::new()
        .route("/:id", delete(delete_post))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ADMIN_EDITOR, req, next)
        }));

    let reads = Router::new()
        .route("/", get(list_posts))
        .route("/:id", get(get_post));

    writes.merge(deletes).merge(reads)
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub status: String,
}

/// Post list query: pagination plus optional title search
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PostListQuery {
    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub author: String,
    pub status: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostRecord> for PostResponse {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            category_id: record.category_id,
            author: record.author,
            status: record.status,
            created_by: record.created_by,
            modified_by: record.modified_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn create_post(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = PostService::create(
        state.db(),
        &actor,
        CreatePostInput {
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            status: req.status,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> ApiResult<Json<ListResponse<PostResponse>>> {
    let params = query.pagination().normalize();
    let (records, total) = PostService::list(
        state.db(),
        query.search.as_deref(),
        params.limit,
        params.offset,
    )
    .await?;
    let items = records.into_iter().map(PostResponse::from).collect();
    Ok(Json(ListResponse::new(items, total, params)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::get(state.db(), id).await?;
    Ok(Json(post.into()))
}

async fn update_post(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = PostService::update(
        state.db(),
        &actor,
        id,
        UpdatePostInput {
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            status: req.status,
        },
    )
    .await?;
    Ok(Json(post.into()))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    PostService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
