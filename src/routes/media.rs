//! Media metadata routes
//!
//! Create is open to all roles, update/delete to admin and editor, reads
//! to any authenticated role.

use crate::auth::{require_role, AuthUser, Role};
use crate::error::ApiResult;
use crate::repositories::MediaRecord;
use crate::services::{MediaInput, MediaService};
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
const ALL_ROLES: &[Role] = &[Role::Admin, Role::Editor, Role::Author];

/// Create media routes
pub fn media_routes() -> Router<AppState> {
    let creates = Router::new()
        .route("/", post(create_media))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ALL_ROLES, req, next)
        }));

    let writes = Router::new()
        .route("/:id", put(update_media).delete(delete_media))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ADMIN_EDITOR, req, next)
        }));

    let reads = Router::new()
        .route("/", get(list_media))
        .route("/:id", get(get_media));

    creates.merge(writes).merge(reads)
}

#[derive(Debug, Deserialize)]
pub struct MediaRequest {
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MediaRecord> for MediaResponse {
    fn from(record: MediaRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name,
            file_path: record.file_path,
            post_id: record.post_id,
            created_by: record.created_by,
            modified_by: record.modified_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

async fn create_media(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(req): Json<MediaRequest>,
) -> ApiResult<(StatusCode, Json<MediaResponse>)> {
    let media = MediaService::create(
        state.db(),
        &actor,
        MediaInput {
            file_name: req.file_name,
            file_path: req.file_path,
            post_id: req.post_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(media.into())))
}

async fn list_media(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<ListResponse<MediaResponse>>> {
    let params = pagination.normalize();
    let (records, total) = MediaService::list(state.db(), params.limit, params.offset).await?;
    let items = records.into_iter().map(MediaResponse::from).collect();
    Ok(Json(ListResponse::new(items, total, params)))
}

async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MediaResponse>> {
    let media = MediaService::get(state.db(), id).await?;
    Ok(Json(media.into()))
}

async fn update_media(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MediaRequest>,
) -> ApiResult<Json<MediaResponse>> {
    let media = MediaService::update(
        state.db(),
        &actor,
        id,
        MediaInput {
            file_name: req.file_name,
            file_path: req.file_path,
            post_id: req.post_id,
        },
    )
    .await?;
    Ok(Json(media.into()))
}

async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    MediaService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
