//! Password hashing using bcrypt
//!
//! bcrypt is intentionally CPU-intensive; the async variants offload the
//! work to the blocking thread pool so it never stalls the runtime.

use anyhow::Result;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    }

    /// Hash a password without blocking the async runtime
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    pub fn verify(password: &str, hashed: &str) -> Result<bool> {
        verify(password, hashed).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a password without blocking the async runtime
    pub async fn verify_async(password: String, hashed: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hashed))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = "secure_password_123";
        let hashed = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hashed).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let password = "test_password";
        let h1 = PasswordService::hash(password).unwrap();
        let h2 = PasswordService::hash(password).unwrap();

        // Salts are random
        assert_ne!(h1, h2);
        assert!(PasswordService::verify(password, &h1).unwrap());
        assert!(PasswordService::verify(password, &h2).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(PasswordService::verify("anything", "not-a-bcrypt-hash").is_err());
    }

    #[tokio::test]
    async fn async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hashed = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password, hashed.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hashed).await.unwrap());
    }
}
