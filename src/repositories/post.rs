//! Post repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    /// Username of the writing user; ownership checks compare against it
    pub author: String,
    /// "draft" or "published"
    pub status: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub author: String,
    pub status: String,
    pub created_by: String,
}

/// Input for updating a post
#[derive(Debug, Clone)]
pub struct UpdatePost {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub status: String,
    pub modified_by: String,
}

const POST_COLUMNS: &str = "id, title, content, category_id, author, status, \
                            created_by, modified_by, created_at, updated_at";

/// Post repository for database operations
pub struct PostRepository;

impl PostRepository {
    /// Create a new post
    pub async fn create(pool: &PgPool, input: CreatePost) -> Result<PostRecord> {
        let record = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            INSERT INTO posts (title, content, category_id, author, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.category_id)
        .bind(&input.author)
        .bind(&input.status)
        .bind(&input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PostRecord>> {
        let record = sqlx::query_as::<_, PostRecord>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List posts, newest first, optionally filtered by a title search term
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PostRecord>, i64)> {
        let pattern = search.map(|s| format!("%{}%", s));

        let records = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE ($1::text IS NULL OR title ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM posts WHERE ($1::text IS NULL OR title ILIKE $1)")
                .bind(&pattern)
                .fetch_one(pool)
                .await?;

        Ok((records, total.0))
    }

    /// Update a post; returns None when the id does not exist.
    ///
    /// `author` and `created_by` are immutable after creation.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdatePost) -> Result<Option<PostRecord>> {
        let record = sqlx::query_as::<_, PostRecord>(&format!(
            r#"
            UPDATE posts
            SET title = $2, content = $3, category_id = $4, status = $5,
                modified_by = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.category_id)
        .bind(&input.status)
        .bind(&input.modified_by)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a post; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
