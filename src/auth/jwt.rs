//! JWT issuance and verification
//!
//! Tokens come in two classes, access and refresh, distinguished by the
//! `iss` claim. Both are HS256-signed with a server-held secret. Keys are
//! pre-computed once at startup and shared via cheap clones.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::role::Role;

/// Token class, carried in the `iss` claim.
///
/// An access token must never be accepted where a refresh token is
/// required, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl TokenClass {
    pub fn issuer(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token class: "access" or "refresh"
    pub iss: String,
    /// Subject (user ID)
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Internal token error kinds.
///
/// These are for logging and diagnostics only. The external contract is
/// binary: a token is valid or it is not. Nothing here reaches a client.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signing method")]
    InvalidSigningMethod,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("expected {} token", .expected.issuer())]
    WrongClass { expected: TokenClass },
    #[error("malformed token")]
    Malformed,
    #[error("token signing failed")]
    CreationFailed(#[source] jsonwebtoken::errors::Error),
}

/// A freshly signed token plus its expiry, for the token-pair response
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration time (Unix timestamp)
    pub expires_at: i64,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from the server secret, once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token issuance and verification
///
/// Construct once at startup from config and share via AppState; this is
/// the only place the signing secret lives after boot.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Issue an access token (15 minutes by default)
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, username, role, TokenClass::Access, self.access_token_expiry_secs)
    }

    /// Issue a refresh token (7 days by default)
    pub fn issue_refresh_token(
        &self,
        user_id: Uuid,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, TokenError> {
        self.issue(user_id, username, role, TokenClass::Refresh, self.refresh_token_expiry_secs)
    }

    fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        role: Role,
        class: TokenClass,
        expiry_secs: i64,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(expiry_secs)).timestamp();

        let claims = Claims {
            iss: class.issuer().to_string(),
            sub: user_id,
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(TokenError::CreationFailed)?;

        Ok(IssuedToken { token, expires_at: exp })
    }

    /// Verify a token in a single pass: algorithm, signature, expiry, class.
    ///
    /// Restricting the algorithm to HS256 up front closes the
    /// algorithm-confusion hole where an attacker supplies an unsigned or
    /// asymmetrically signed token.
    pub fn verify(&self, token: &str, expected: TokenClass) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::InvalidSigningMethod
                }
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.iss != expected.issuer() {
            return Err(TokenError::WrongClass { expected });
        }

        Ok(data.claims)
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry_secs(&self) -> i64 {
        self.refresh_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test-secret", 900, 604800)
    }

    #[test]
    fn access_token_round_trips_claims() {
        let service = test_service();
        let user_id = Uuid::new_v4();

        let issued = service.issue_access_token(user_id, "alice", Role::Editor).unwrap();
        let claims = service.verify(&issued.token, TokenClass::Access).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Editor);
        assert_eq!(claims.iss, "access");
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn refresh_token_carries_refresh_issuer() {
        let service = test_service();
        let issued = service
            .issue_refresh_token(Uuid::new_v4(), "bob", Role::Author)
            .unwrap();
        let claims = service.verify(&issued.token, TokenClass::Refresh).unwrap();

        assert_eq!(claims.iss, "refresh");
        // 7 days out, allow a little slack for test runtime
        let expected = Utc::now().timestamp() + 604800;
        assert!((claims.exp - expected).abs() < 5);
    }

    #[test]
    fn access_token_rejected_where_refresh_expected() {
        let service = test_service();
        let issued = service
            .issue_access_token(Uuid::new_v4(), "alice", Role::Admin)
            .unwrap();

        let err = service.verify(&issued.token, TokenClass::Refresh).unwrap_err();
        assert!(matches!(err, TokenError::WrongClass { expected: TokenClass::Refresh }));
    }

    #[test]
    fn refresh_token_rejected_where_access_expected() {
        let service = test_service();
        let issued = service
            .issue_refresh_token(Uuid::new_v4(), "alice", Role::Admin)
            .unwrap();

        let err = service.verify(&issued.token, TokenClass::Access).unwrap_err();
        assert!(matches!(err, TokenError::WrongClass { expected: TokenClass::Access }));
    }

    #[test]
    fn token_signed_with_other_secret_rejected() {
        let service = test_service();
        let foreign = JwtService::new("another-secret", 900, 604800);

        let issued = foreign
            .issue_access_token(Uuid::new_v4(), "mallory", Role::Admin)
            .unwrap();

        let err = service.verify(&issued.token, TokenClass::Access).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_rejected_despite_valid_signature() {
        // Negative expiry puts exp well past the validation leeway
        let service = JwtService::new("test-secret", -120, -120);
        let issued = service
            .issue_access_token(Uuid::new_v4(), "alice", Role::Admin)
            .unwrap();

        let verifier = JwtService::new("test-secret", 900, 604800);
        let err = verifier.verify(&issued.token, TokenClass::Access).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn garbage_token_rejected() {
        let service = test_service();
        let err = service.verify("not.a.token", TokenClass::Access).unwrap_err();
        assert!(matches!(err, TokenError::Malformed | TokenError::InvalidSignature));
    }

    #[test]
    fn unsigned_token_rejected_as_wrong_algorithm() {
        // alg=none style forgery: header claims "none", no signature
        let header = r#"{"alg":"none","typ":"JWT"}"#;
        let claims = format!(
            r#"{{"iss":"access","sub":"{}","username":"mallory","role":"admin","iat":0,"exp":32503680000}}"#,
            Uuid::new_v4()
        );
        use base64::Engine as _;
        let enc = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let forged = format!("{}.{}.", enc.encode(header), enc.encode(claims));

        let service = test_service();
        assert!(service.verify(&forged, TokenClass::Access).is_err());
    }

    #[test]
    fn service_clone_is_cheap() {
        let service = test_service();
        let cloned = service.clone();
        let issued = service
            .issue_access_token(Uuid::new_v4(), "alice", Role::Admin)
            .unwrap();
        assert!(cloned.verify(&issued.token, TokenClass::Access).is_ok());
    }
}
