//! Data access layer
//!
//! One repository per entity, each a thin wrapper over sqlx queries
//! against the PostgreSQL pool. No business logic lives here.

mod category;
mod media;
mod post;
mod user;

pub use category::{CategoryRecord, CategoryRepository, CreateCategory, UpdateCategory};
pub use media::{CreateMedia, MediaRecord, MediaRepository, UpdateMedia};
pub use post::{CreatePost, PostRecord, PostRepository, UpdatePost};
pub use user::{CreateUser, UpdateUser, UserRecord, UserRepository};
