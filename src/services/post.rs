//! Post management service
//!
//! Beyond plain CRUD this carries the ownership rule: author-role users
//! may only modify their own posts, and their posts always enter as
//! drafts. Admin and editor may touch any post.

use crate::auth::{AuthUser, Role};
use crate::error::ApiError;
use crate::repositories::{
    CategoryRepository, CreatePost, PostRecord, PostRepository, UpdatePost,
};
use sqlx::PgPool;
use uuid::Uuid;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub status: Option<String>,
}

/// Input for updating a post
#[derive(Debug, Clone)]
pub struct UpdatePostInput {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub status: String,
}

/// Post service
pub struct PostService;

impl PostService {
    pub async fn create(
        pool: &PgPool,
        actor: &AuthUser,
        input: CreatePostInput,
    ) -> Result<PostRecord, ApiError> {
        validate_text(&input.title, "title")?;
        validate_text(&input.content, "content")?;
        ensure_category_exists(pool, input.category_id).await?;

        // Authors cannot publish directly
        let status = if actor.role == Role::Author {
            STATUS_DRAFT.to_string()
        } else {
            let status = input.status.unwrap_or_else(|| STATUS_DRAFT.to_string());
            validate_status(&status)?;
            status
        };

        PostRepository::create(
            pool,
            CreatePost {
                title: input.title,
                content: input.content,
                category_id: input.category_id,
                author: actor.username.clone(),
                status,
                created_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<PostRecord, ApiError> {
        PostRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("post not found".to_string()))
    }

    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64), ApiError> {
        PostRepository::list(pool, search, limit, offset)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn update(
        pool: &PgPool,
        actor: &AuthUser,
        id: Uuid,
        input: UpdatePostInput,
    ) -> Result<PostRecord, ApiError> {
        validate_text(&input.title, "title")?;
        validate_text(&input.content, "content")?;
        validate_status(&input.status)?;

        let existing = Self::get(pool, id).await?;
        ensure_can_modify(actor, &existing)?;
        ensure_category_exists(pool, input.category_id).await?;

        // Authors cannot flip their own drafts to published
        let status = if actor.role == Role::Author {
            STATUS_DRAFT.to_string()
        } else {
            input.status
        };

        PostRepository::update(
            pool,
            id,
            UpdatePost {
                title: input.title,
                content: input.content,
                category_id: input.category_id,
                status,
                modified_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("post not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let removed = PostRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if removed {
            Ok(())
        } else {
            Err(ApiError::NotFound("post not found".to_string()))
        }
    }
}

/// Ownership rule: authors may only modify posts they wrote
fn ensure_can_modify(actor: &AuthUser, post: &PostRecord) -> Result<(), ApiError> {
    if actor.role == Role::Author && post.author != actor.username {
        return Err(ApiError::Forbidden(
            "authors may only modify their own posts".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_category_exists(pool: &PgPool, category_id: Uuid) -> Result<(), ApiError> {
    CategoryRepository::find_by_id(pool, category_id)
        .await
        .map_err(ApiError::Internal)?
        .map(|_| ())
        .ok_or_else(|| ApiError::Validation("category does not exist".to_string()))
}

fn validate_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    match status {
        STATUS_DRAFT | STATUS_PUBLISHED => Ok(()),
        _ => Err(ApiError::Validation(
            "status must be draft or published".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn author(username: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            role: Role::Author,
        }
    }

    fn post_by(author: &str) -> PostRecord {
        PostRecord {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            category_id: Uuid::new_v4(),
            author: author.to_string(),
            status: STATUS_DRAFT.to_string(),
            created_by: author.to_string(),
            modified_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_may_modify_own_post() {
        assert!(ensure_can_modify(&author("alice"), &post_by("alice")).is_ok());
    }

    #[test]
    fn author_may_not_modify_foreign_post() {
        assert!(matches!(
            ensure_can_modify(&author("alice"), &post_by("bob")),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn editor_may_modify_any_post() {
        let mut actor = author("eve");
        actor.role = Role::Editor;
        assert!(ensure_can_modify(&actor, &post_by("bob")).is_ok());
    }

    #[test]
    fn status_is_a_closed_set() {
        assert!(validate_status(STATUS_DRAFT).is_ok());
        assert!(validate_status(STATUS_PUBLISHED).is_ok());
        assert!(validate_status("archived").is_err());
    }
}
