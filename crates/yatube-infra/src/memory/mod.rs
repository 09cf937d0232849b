//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories handed out by one [`InMemoryStore`] share the same tables,
//! so they behave like views onto a single database: foreign keys, unique
//! constraints and cascades are enforced here the way the PostgreSQL schema
//! enforces them.

mod repos;

use std::sync::Arc;

use tokio::sync::RwLock;

use yatube_core::domain::{Comment, Follow, Group, Post, User};

pub use repos::{
    InMemoryCommentRepository, InMemoryFollowRepository, InMemoryGroupRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};

/// Rows of every table, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Vec<User>,
    pub(crate) groups: Vec<Group>,
    pub(crate) posts: Vec<Post>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) follows: Vec<Follow>,
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;

/// Handle to a set of in-memory tables.
///
/// Cloning the store clones the handle, not the data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: SharedTables,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.tables.clone())
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository::new(self.tables.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.tables.clone())
    }

    pub fn follows(&self) -> InMemoryFollowRepository {
        InMemoryFollowRepository::new(self.tables.clone())
    }
}
