//! Category repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Category record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: String,
    pub created_by: String,
}

/// Input for updating a category
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub name: String,
    pub description: String,
    pub modified_by: String,
}

const CATEGORY_COLUMNS: &str =
    "id, name, description, created_by, modified_by, created_at, updated_at";

/// Category repository for database operations
pub struct CategoryRepository;

impl CategoryRepository {
    /// Create a new category
    pub async fn create(pool: &PgPool, input: CreateCategory) -> Result<CategoryRecord> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            r#"
            INSERT INTO categories (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#,
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CategoryRecord>> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List categories, newest first, with total count for pagination
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CategoryRecord>, i64)> {
        let records = sqlx::query_as::<_, CategoryRecord>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;

        Ok((records, total.0))
    }

    /// Update a category; returns None when the id does not exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateCategory,
    ) -> Result<Option<CategoryRecord>> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!(
            r#"
            UPDATE categories
            SET name = $2, description = $3, modified_by = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.modified_by)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a category; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
