//! Database connection and pool management
//!
//! Connection pooling with production settings (health checks, connection
//! timeouts), migrations, and the bootstrap seeder.

use crate::auth::{PasswordService, Role};
use crate::repositories::{CategoryRepository, CreateCategory, CreateUser, UserRepository};
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Database configuration for pool creation
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool with production-ready settings
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let config = DbConfig {
        url: database_url.to_string(),
        max_connections,
        ..Default::default()
    };
    create_pool_with_config(&config).await
}

/// Create a PostgreSQL connection pool with custom configuration
pub async fn create_pool_with_config(config: &DbConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("cms-api");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        "Database pool created: max={}, min={}",
        config.max_connections, config.min_connections
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

/// Seed the bootstrap admin account
///
/// Invoked via `cms-api --seed`; idempotent, skips when the username is
/// already taken.
pub async fn seed_admin(pool: &PgPool) -> Result<()> {
    if UserRepository::find_by_username(pool, "admin").await?.is_some() {
        info!("Admin account already present, skipping seed");
        return Ok(());
    }

    let password_hash = PasswordService::hash_async("admin".to_string()).await?;

    let user = UserRepository::create(
        pool,
        CreateUser {
            username: "admin".to_string(),
            fullname: "CMS Administrator".to_string(),
            email: "admin@cms-api.local".to_string(),
            password_hash,
            role: Role::Admin,
            created_by: "seeder".to_string(),
        },
    )
    .await?;

    info!(user_id = %user.id, "Seeded admin account (change the default password!)");
    Ok(())
}

/// Bootstrap categories inserted by `cms-api --seed`
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("News", "Latest updates and important events to keep users informed."),
    ("Articles", "Informative content that provides in-depth discussion on specific topics."),
    ("Blog", "Casual posts featuring opinions, stories, or personal and business experiences."),
    ("Static Pages", "Permanent and essential information, such as \"About Us\" or \"Contact.\""),
    ("Gallery", "A collection of images or videos showcasing visual documentation."),
    ("Products", "A catalog of goods or services offered, including descriptions and prices."),
    ("FAQ", "Answers to common questions to help users understand the service."),
    ("Events", "Information about upcoming or past events with relevant details."),
    ("Portfolio", "A showcase of projects or work highlighting skills and achievements."),
    ("Announcements", "Brief notifications about urgent or important information."),
    ("Documents", "Files and documents available for users to download or access."),
    ("Testimonials", "Customer reviews that build credibility for products or services."),
];

/// Seed the bootstrap categories; skips when any category already exists
pub async fn seed_categories(pool: &PgPool) -> Result<()> {
    let (_, total) = CategoryRepository::list(pool, 1, 0).await?;
    if total > 0 {
        info!("Categories already present, skipping seed");
        return Ok(());
    }

    for (name, description) in DEFAULT_CATEGORIES {
        CategoryRepository::create(
            pool,
            CreateCategory {
                name: (*name).to_string(),
                description: (*description).to_string(),
                created_by: "seeder".to_string(),
            },
        )
        .await?;
    }

    info!(count = DEFAULT_CATEGORIES.len(), "Seeded bootstrap categories");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout_secs, 30);
    }

    #[test]
    fn default_categories_have_unique_names() {
        let mut names: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_CATEGORIES.len());
        assert!(DEFAULT_CATEGORIES
            .iter()
            .all(|(name, description)| !name.is_empty() && !description.is_empty()));
    }
}
