//! Category routes
//!
//! Writes are gated to admin and editor; reads are open to any
//! authenticated role.

use crate::auth::{require_role, AuthUser, Role};
use crate::error::ApiResult;
use crate::repositories::CategoryRecord;
use crate::services::{CategoryInput, CategoryService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ListResponse, Pagination};

const ADMIN_EDITOR: &[Role] = &[Role::Admin, Role::Editor];

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    let writes = Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ADMIN_EDITOR, req, next)
        }));

    let reads = Router::new()
        .route("/", get(list_categories))
        .route("/:id", get(get_category));

    writes.merge(reads)
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            created_by: record.created_by,
            modified_by: record.modified_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn create_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let category = CategoryService::create(
        state.db(),
        &actor,
        CategoryInput {
            name: req.name,
            description: req.description,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

async fn list_categories(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<ListResponse<CategoryResponse>>> {
    let params = pagination.normalize();
    let (records, total) = CategoryService::list(state.db(), params.limit, params.offset).await?;
    let items = records.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ListResponse::new(items, total, params)))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = CategoryService::get(state.db(), id).await?;
    Ok(Json(category.into()))
}

async fn update_category(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = CategoryService::update(
        state.db(),
        &actor,
        id,
        CategoryInput {
            name: req.name,
            description: req.description,
        },
    )
    .await?;
    Ok(Json(category.into()))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    CategoryService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
