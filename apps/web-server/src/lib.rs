//! # Yatube web server
//!
//! Blog pages over actix-web: post listings, profiles, groups, comments,
//! subscriptions and accounts. The binary in `main.rs` wires configuration and
//! telemetry around [`configure_routes`]; integration tests mount
//! the same routes on in-memory state.

pub mod config;
pub mod context;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod views;

pub use config::{AppConfig, SiteSettings};
pub use handlers::configure_routes;
pub use state::AppState;
