//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`.
//! This crate contains database, cache and authentication integrations.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `auth` (default) - JWT + Argon2 authentication
//! - `redis` - Redis-backed page cache
//! - `full` - all of the above
//! - `minimal` - in-memory repositories and cache only

pub mod cache;
#[cfg(feature = "postgres")]
pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use cache::InMemoryCache;
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};
