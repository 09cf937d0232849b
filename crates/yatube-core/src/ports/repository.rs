use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, PostFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup, order unspecified. Unknown IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError>;

    /// Every group, ordered by title.
    async fn list_all(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository.
///
/// Listings are always ordered newest first.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments under a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Follow repository.
#[async_trait]
pub trait FollowRepository: BaseRepository<Follow, Uuid> {
    async fn find_pair(&self, user_id: Uuid, author_id: Uuid)
    -> Result<Option<Follow>, RepoError>;

    /// Delete the follow of `user_id` on `author_id`. Returns whether a row was removed.
    async fn delete_pair(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Number of users following `author_id`.
    async fn count_followers(&self, author_id: Uuid) -> Result<u64, RepoError>;

    /// Number of authors `user_id` follows.
    async fn count_following(&self, user_id: Uuid) -> Result<u64, RepoError>;

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.find_pair(user_id, author_id).await?.is_some())
    }
}
