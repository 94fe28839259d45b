//! Media metadata service
//!
//! File bytes live in external storage; this service only manages the
//! metadata rows and the optional link to a post.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{CreateMedia, MediaRecord, MediaRepository, PostRepository, UpdateMedia};
use sqlx::PgPool;
use uuid::Uuid;

/// Input for creating or updating a media record
#[derive(Debug, Clone)]
pub struct MediaInput {
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
}

/// Media service
pub struct MediaService;

impl MediaService {
    pub async fn create(
        pool: &PgPool,
        actor: &AuthUser,
        input: MediaInput,
    ) -> Result<MediaRecord, ApiError> {
        validate_input(&input)?;
        ensure_post_exists(pool, input.post_id).await?;

        MediaRepository::create(
            pool,
            CreateMedia {
                file_name: input.file_name,
                file_path: input.file_path,
                post_id: input.post_id,
                created_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<MediaRecord, ApiError> {
        MediaRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("media not found".to_string()))
    }

    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<MediaRecord>, i64), ApiError> {
        MediaRepository::list(pool, limit, offset)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn update(
        pool: &PgPool,
        actor: &AuthUser,
        id: Uuid,
        input: MediaInput,
    ) -> Result<MediaRecord, ApiError> {
        validate_input(&input)?;
        ensure_post_exists(pool, input.post_id).await?;

        MediaRepository::update(
            pool,
            id,
            UpdateMedia {
                file_name: input.file_name,
                file_path: input.file_path,
                post_id: input.post_id,
                modified_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("media not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let removed = MediaRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if removed {
            Ok(())
        } else {
            Err(ApiError::NotFound("media not found".to_string()))
        }
    }
}

fn validate_input(input: &MediaInput) -> Result<(), ApiError> {
    if input.file_name.trim().is_empty() {
        return Err(ApiError::Validation("file_name is required".to_string()));
    }
    if input.file_path.trim().is_empty() {
        return Err(ApiError::Validation("file_path is required".to_string()));
    }
    Ok(())
}

async fn ensure_post_exists(pool: &PgPool, post_id: Option<Uuid>) -> Result<(), ApiError> {
    let Some(post_id) = post_id else {
        return Ok(());
    };
    PostRepository::find_by_id(pool, post_id)
        .await
        .map_err(ApiError::Internal)?
        .map(|_| ())
        .ok_or_else(|| ApiError::Validation("post does not exist".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_fields_are_required() {
        let input = MediaInput {
            file_name: String::new(),
            file_path: "/uploads/a.png".to_string(),
            post_id: None,
        };
        assert!(validate_input(&input).is_err());

        let input = MediaInput {
            file_name: "a.png".to_string(),
            file_path: String::new(),
            post_id: None,
        };
        assert!(validate_input(&input).is_err());

        let input = MediaInput {
            file_name: "a.png".to_string(),
            file_path: "/uploads/a.png".to_string(),
            post_id: None,
        };
        assert!(validate_input(&input).is_ok());
    }
}
