//! User repository for database operations
//!
//! The auth subsystem only reads from here (credential lookup); the
//! admin-gated user CRUD writes.

use crate::auth::Role;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
///
/// `role` is stored as lowercase text; callers parse it into [`Role`]
/// at the domain boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_by: String,
    pub modified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_by: String,
}

/// Input for updating a user
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub fullname: String,
    pub email: String,
    pub role: Role,
    /// Replaced only when a new password was supplied
    pub password_hash: Option<String>,
    pub modified_by: String,
}

const USER_COLUMNS: &str = "id, username, fullname, email, password_hash, role, \
                            created_by, modified_by, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, fullname, email, password_hash, role, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&input.username)
        .bind(&input.fullname)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role.as_str())
        .bind(&input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a user by exact username match (credential lookup)
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1",
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Check whether a username is already taken
    pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(exists.0)
    }

    /// List users, newest first, with total count for pagination
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<(Vec<UserRecord>, i64)> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok((records, total.0))
    }

    /// Update a user; returns None when the id does not exist
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateUser) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
            SET fullname = $2,
                email = $3,
                role = $4,
                password_hash = COALESCE($5, password_hash),
                modified_by = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.fullname)
        .bind(&input.email)
        .bind(input.role.as_str())
        .bind(&input.password_hash)
        .bind(&input.modified_by)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete a user; returns whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
