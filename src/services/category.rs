//! Category management service

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{CategoryRecord, CategoryRepository, CreateCategory, UpdateCategory};
use sqlx::PgPool;
use uuid::Uuid;

/// Input for creating or updating a category
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: String,
}

/// Category service
pub struct CategoryService;

impl CategoryService {
    pub async fn create(
        pool: &PgPool,
        actor: &AuthUser,
        input: CategoryInput,
    ) -> Result<CategoryRecord, ApiError> {
        validate_name(&input.name)?;

        CategoryRepository::create(
            pool,
            CreateCategory {
                name: input.name,
                description: input.description,
                created_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<CategoryRecord, ApiError> {
        CategoryRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("category not found".to_string()))
    }

    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CategoryRecord>, i64), ApiError> {
        CategoryRepository::list(pool, limit, offset)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn update(
        pool: &PgPool,
        actor: &AuthUser,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<CategoryRecord, ApiError> {
        validate_name(&input.name)?;

        CategoryRepository::update(
            pool,
            id,
            UpdateCategory {
                name: input.name,
                description: input.description,
                modified_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("category not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let removed = CategoryRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if removed {
            Ok(())
        } else {
            Err(ApiError::NotFound("category not found".to_string()))
        }
    }
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("News").is_ok());
    }
}
