//! Authentication and authorization
//!
//! JWT-based sessions (access + refresh token pair), bcrypt password
//! hashing, and the auth/role middleware gates.

mod jwt;
mod middleware;
mod password;
mod role;

pub use jwt::{Claims, IssuedToken, JwtService, TokenClass, TokenError};
pub use middleware::{auth_middleware, require_role, AuthUser};
pub use password::PasswordService;
pub use role::Role;
