//! User management service (admin-gated CRUD)

use crate::auth::{AuthUser, PasswordService, Role};
use crate::error::ApiError;
use crate::repositories::{CreateUser, UpdateUser, UserRecord, UserRepository};
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Input for updating a user
#[derive(Debug, Clone)]
pub struct UpdateUserInput {
    pub fullname: String,
    pub email: String,
    pub role: Role,
    pub password: Option<String>,
}

/// User service
pub struct UserService;

impl UserService {
    pub async fn create(
        pool: &PgPool,
        actor: &AuthUser,
        input: CreateUserInput,
    ) -> Result<UserRecord, ApiError> {
        validate_username(&input.username)?;
        validate_fullname(&input.fullname)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if UserRepository::username_exists(pool, &input.username)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("username already taken".to_string()));
        }
        if UserRepository::email_exists(pool, &input.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        UserRepository::create(
            pool,
            CreateUser {
                username: input.username,
                fullname: input.fullname,
                email: input.email,
                password_hash,
                role: input.role,
                created_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }

    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<UserRecord>, i64), ApiError> {
        UserRepository::list(pool, limit, offset)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn update(
        pool: &PgPool,
        actor: &AuthUser,
        id: Uuid,
        input: UpdateUserInput,
    ) -> Result<UserRecord, ApiError> {
        validate_fullname(&input.fullname)?;
        validate_email(&input.email)?;

        let password_hash = match input.password {
            Some(password) => {
                validate_password(&password)?;
                Some(
                    PasswordService::hash_async(password)
                        .await
                        .map_err(ApiError::Internal)?,
                )
            }
            None => None,
        };

        UserRepository::update(
            pool,
            id,
            UpdateUser {
                fullname: input.fullname,
                email: input.email,
                role: input.role,
                password_hash,
                modified_by: actor.username.clone(),
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let removed = UserRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?;
        if removed {
            Ok(())
        } else {
            Err(ApiError::NotFound("user not found".to_string()))
        }
    }
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::Validation(
            "username must be between 3 and 50 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_fullname(fullname: &str) -> Result<(), ApiError> {
    if fullname.len() < 6 {
        return Err(ApiError::Validation(
            "fullname must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if !email.validate_email() {
        return Err(ApiError::Validation("invalid email format".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn email_format_checked() {
        assert!(validate_email("admin@cms-api.local").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
