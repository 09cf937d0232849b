//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;

pub use error::DomainError;
pub use pagination::{Page, Paginator};
