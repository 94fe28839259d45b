//! Authentication service: credential verification and the token lifecycle
//!
//! Login verifies a username/password pair against the stored bcrypt hash
//! and mints an access/refresh token pair. Refresh verifies a
//! refresh-class token and rotates the pair. Both operations either
//! return a complete pair or nothing; there is no partial success.

use crate::auth::{JwtService, PasswordService, Role, TokenClass};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use serde::Serialize;
use sqlx::PgPool;
use tracing::debug;

/// Token pair returned by login and refresh
///
/// Expiries are Unix timestamps so clients can schedule refreshes without
/// decoding the tokens.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expired_access_token: i64,
    pub expired_refresh_token: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Verify credentials and mint a token pair.
    ///
    /// Unknown username and wrong password produce the same external
    /// error; the distinction exists only in logs.
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, ApiError> {
        let user = UserRepository::find_by_username(pool, username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                debug!(username, "Login failed: unknown username");
                ApiError::Unauthorized("invalid username or password".to_string())
            })?;

        // bcrypt comparison on the blocking thread pool
        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            debug!(username, "Login failed: password mismatch");
            return Err(ApiError::Unauthorized(
                "invalid username or password".to_string(),
            ));
        }

        let role = parse_stored_role(&user.role)?;
        Self::issue_pair(jwt, user.id, &user.username, role)
    }

    /// Verify a refresh-class token and rotate the pair.
    ///
    /// The role is re-read from the store so a role change takes effect
    /// at the next refresh rather than living on in old claims.
    pub async fn refresh(
        pool: &PgPool,
        jwt: &JwtService,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError> {
        let claims = jwt.verify(refresh_token, TokenClass::Refresh).map_err(|e| {
            debug!("Refresh token rejected: {}", e);
            ApiError::Unauthorized("invalid or expired refresh token".to_string())
        })?;

        let user = UserRepository::find_by_id(pool, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                debug!(user_id = %claims.sub, "Refresh failed: user no longer exists");
                ApiError::Unauthorized("invalid or expired refresh token".to_string())
            })?;

        let role = parse_stored_role(&user.role)?;
        Self::issue_pair(jwt, user.id, &user.username, role)
    }

    fn issue_pair(
        jwt: &JwtService,
        user_id: uuid::Uuid,
        username: &str,
        role: Role,
    ) -> Result<TokenPair, ApiError> {
        // Signing failure is fatal to the request, never retried
        let access = jwt
            .issue_access_token(user_id, username, role)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("access token signing: {}", e)))?;
        let refresh = jwt
            .issue_refresh_token(user_id, username, role)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("refresh token signing: {}", e)))?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            expired_access_token: access.expires_at,
            expired_refresh_token: refresh.expires_at,
        })
    }
}

/// Parse a role string coming from the store.
///
/// The column is constrained to the closed set, so an unknown value is
/// data corruption, not client error.
fn parse_stored_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("corrupt role in store: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenClass;
    use uuid::Uuid;

    #[test]
    fn token_pair_serializes_with_expiry_fields() {
        let jwt = JwtService::new("test-secret", 900, 604800);
        let pair = AuthService::issue_pair(&jwt, Uuid::new_v4(), "alice", Role::Admin).unwrap();

        let json = serde_json::to_value(&pair).unwrap();
        assert!(json["access_token"].is_string());
        assert!(json["refresh_token"].is_string());
        assert!(json["expired_access_token"].is_i64());
        assert!(json["expired_refresh_token"].is_i64());
    }

    #[test]
    fn issued_pair_has_matching_classes() {
        let jwt = JwtService::new("test-secret", 900, 604800);
        let user_id = Uuid::new_v4();
        let pair = AuthService::issue_pair(&jwt, user_id, "alice", Role::Editor).unwrap();

        let access = jwt.verify(&pair.access_token, TokenClass::Access).unwrap();
        let refresh = jwt.verify(&pair.refresh_token, TokenClass::Refresh).unwrap();

        assert_eq!(access.sub, user_id);
        assert_eq!(refresh.sub, user_id);
        assert_eq!(access.role, Role::Editor);
        assert_eq!(refresh.role, Role::Editor);
        assert_eq!(pair.expired_access_token, access.exp);
        assert_eq!(pair.expired_refresh_token, refresh.exp);
    }

    #[test]
    fn parse_stored_role_rejects_garbage() {
        assert!(parse_stored_role("admin").is_ok());
        assert!(matches!(
            parse_stored_role("root"),
            Err(ApiError::Internal(_))
        ));
    }
}
