//! Media repository for database operations
//!
//! Stores media metadata only; the file bytes live in external storage
//! and `file_path` is opaque to this service.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Media record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a media record
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
    pub created_by: String,
}

/// Input for updating a media record
#[derive(Debug, Clone)]
pub struct UpdateMedia {
    pub file_name: String,
    pub file_path: String,
    pub post_id: Option<Uuid>,
    pub modified_by: String,
}

const MEDIA_COLUMNS: &str =
    "id, file_name, file_path, post_id, created_by, modified_by, created_at, updated_at";

/// Media repository for database operations
pub struct MediaRepository;

impl MediaRepository {
    /// Create a new media record
    pub async fn create(pool: &PgPool, input: CreateMedia) -> Result<MediaRecord> {
        let record = sqlx::query_as::<_, MediaRecord>(&format!(
            r#"
            INSERT INTO media (file_name, file_path, post_id, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {MEDIA_COLUMNS}
            "#,
        ))
        .bind(&input.file_name)
        .bind(&input.file_path)
        .bind(input.post_id)
        .bind(&input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a media record by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MediaRecord>> {
        let record = sqlx::query_as::<_, MediaRecord>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List media records, newest first, with total count for pagination
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<(Vec<MediaRecord>, i64)> {
        let records = sqlx::query_as::<_, MediaRecord>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media")
            .fetch_one(pool)
            .await?;

        Ok((records, total.0))
    }

    /// Update a media record; returns None when the id does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateMedia,
    ) -> Result<Option<MediaRecord>> {
        let record = sqlx::query_as::<_, MediaRecord>(&format!(
            r#"
            UPDATE media
            SET file_name = $2, file_path = $3, post_id = $4,
                modified_by = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {MEDIA_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.file_name)
        .bind(&input.file_path)
        .bind(input.post_id)
        .bind(&input.modified_by)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a media record; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
