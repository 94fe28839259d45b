//! CMS API Library
//!
//! Content-management REST API with JWT authentication and role-based
//! authorization over users, categories, posts, and media.
//!
//! ## Architecture
//!
//! Layered: routes (HTTP) -> services (business rules) -> repositories
//! (data access) -> PostgreSQL via SQLx. The auth subsystem (token
//! lifecycle plus the auth/role gates) lives in [`auth`].

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
