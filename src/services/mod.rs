//! Business logic layer
//!
//! Services validate input, enforce ownership and role rules that go
//! beyond route gating, and translate repository errors into API errors.

mod auth;
mod category;
mod media;
mod post;
mod user;

pub use auth::{AuthService, TokenPair};
pub use category::{CategoryInput, CategoryService};
pub use media::{MediaInput, MediaService};
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
