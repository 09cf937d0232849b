//! Port implementations over the shared in-memory tables.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use yatube_core::domain::{Comment, Follow, Group, Post, PostFilter, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};

use super::{SharedTables, Tables};

fn constraint(message: impl Into<String>) -> RepoError {
    RepoError::Constraint(message.into())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// In-memory user repository.
pub struct InMemoryUserRepository {
    tables: SharedTables,
}

impl InMemoryUserRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(constraint(format!(
                "user '{}' already exists",
                user.username
            )));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(constraint(format!(
                "user '{}' already exists",
                user.username
            )));
        }
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepoError::NotFound);
        }

        let removed_posts: HashSet<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.author_id != id && !removed_posts.contains(&c.post_id));
        tables
            .follows
            .retain(|f| f.user_id != id && f.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// In-memory group repository.
pub struct InMemoryGroupRepository {
    tables: SharedTables,
}

impl InMemoryGroupRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn create(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .groups
            .iter()
            .any(|g| g.id == group.id || g.slug == group.slug)
        {
            return Err(constraint(format!("group '{}' already exists", group.slug)));
        }
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn update(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .groups
            .iter()
            .any(|g| g.id != group.id && g.slug == group.slug)
        {
            return Err(constraint(format!("group '{}' already exists", group.slug)));
        }
        let slot = tables
            .groups
            .iter_mut()
            .find(|g| g.id == group.id)
            .ok_or(RepoError::NotFound)?;
        *slot = group.clone();
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.groups.len();
        tables.groups.retain(|g| g.id != id);
        if tables.groups.len() == before {
            return Err(RepoError::NotFound);
        }

        // Posts outlive their group.
        for post in tables.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        let mut groups = tables.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// In-memory post repository.
pub struct InMemoryPostRepository {
    tables: SharedTables,
}

impl InMemoryPostRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }

    fn check_references(tables: &Tables, post: &Post) -> Result<(), RepoError> {
        if !tables.users.iter().any(|u| u.id == post.author_id) {
            return Err(constraint("post author does not exist"));
        }
        if let Some(group_id) = post.group_id {
            if !tables.groups.iter().any(|g| g.id == group_id) {
                return Err(constraint("post group does not exist"));
            }
        }
        Ok(())
    }

    /// Posts matching `filter`, newest first. Posts sharing a timestamp keep
    /// reverse insertion order.
    fn select(tables: &Tables, filter: PostFilter) -> Vec<&Post> {
        let followed: HashSet<Uuid> = match filter {
            PostFilter::FollowedBy(user_id) => tables
                .follows
                .iter()
                .filter(|f| f.user_id == user_id)
                .map(|f| f.author_id)
                .collect(),
            _ => HashSet::new(),
        };

        let mut posts: Vec<&Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| match filter {
                PostFilter::All => true,
                PostFilter::Group(group_id) => p.group_id == Some(group_id),
                PostFilter::Author(author_id) => p.author_id == author_id,
                PostFilter::FollowedBy(_) => followed.contains(&p.author_id),
            })
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.id == post.id) {
            return Err(constraint("post already exists"));
        }
        Self::check_references(&tables, &post)?;
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        Self::check_references(&tables, &post)?;
        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::select(&tables, filter).len() as u64)
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::select(&tables, filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    tables: SharedTables,
}

impl InMemoryCommentRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }

    fn check_references(tables: &Tables, comment: &Comment) -> Result<(), RepoError> {
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(constraint("comment post does not exist"));
        }
        if !tables.users.iter().any(|u| u.id == comment.author_id) {
            return Err(constraint("comment author does not exist"));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(constraint("comment already exists"));
        }
        Self::check_references(&tables, &comment)?;
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        Self::check_references(&tables, &comment)?;
        let slot = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *slot = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created));
        Ok(comments)
    }
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

/// In-memory follow repository.
pub struct InMemoryFollowRepository {
    tables: SharedTables,
}

impl InMemoryFollowRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<Follow, Uuid> for InMemoryFollowRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.follows.iter().find(|f| f.id == id).cloned())
    }

    async fn create(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut tables = self.tables.write().await;
        if follow.user_id == follow.author_id {
            return Err(constraint("a user cannot follow themselves"));
        }
        if !tables.users.iter().any(|u| u.id == follow.user_id)
            || !tables.users.iter().any(|u| u.id == follow.author_id)
        {
            return Err(constraint("follow references an unknown user"));
        }
        if tables.follows.iter().any(|f| {
            f.id == follow.id || (f.user_id == follow.user_id && f.author_id == follow.author_id)
        }) {
            return Err(constraint("follow already exists"));
        }
        tables.follows.push(follow.clone());
        Ok(follow)
    }

    async fn update(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut tables = self.tables.write().await;
        if follow.user_id == follow.author_id {
            return Err(constraint("a user cannot follow themselves"));
        }
        if tables.follows.iter().any(|f| {
            f.id != follow.id && f.user_id == follow.user_id && f.author_id == follow.author_id
        }) {
            return Err(constraint("follow already exists"));
        }
        let slot = tables
            .follows
            .iter_mut()
            .find(|f| f.id == follow.id)
            .ok_or(RepoError::NotFound)?;
        *slot = follow.clone();
        Ok(follow)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables.follows.retain(|f| f.id != id);
        if tables.follows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn find_pair(
        &self,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Follow>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .find(|f| f.user_id == user_id && f.author_id == author_id)
            .cloned())
    }

    async fn delete_pair(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(tables.follows.len() != before)
    }

    async fn count_followers(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.author_id == author_id)
            .count() as u64)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::memory::InMemoryStore;

    async fn user(store: &InMemoryStore, username: &str) -> User {
        store
            .users()
            .create(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    async fn group(store: &InMemoryStore, slug: &str) -> Group {
        store
            .groups()
            .create(Group::new(
                format!("Group {slug}"),
                slug.to_string(),
                "Description".to_string(),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryStore::new();
        user(&store, "leo").await;

        let result = store
            .users()
            .create(User::new("leo".to_string(), "hash".to_string()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_requires_existing_group() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;

        let post = Post::new(author.id, "text".to_string(), Some(Uuid::new_v4()), None);
        let result = store.posts().create(post).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_posts_listed_newest_first_with_window() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        let posts = store.posts();

        let mut old = Post::new(author.id, "old".to_string(), None, None);
        old.pub_date = Utc::now() - Duration::days(1);
        posts.create(old).await.unwrap();
        posts
            .create(Post::new(author.id, "first".to_string(), None, None))
            .await
            .unwrap();
        posts
            .create(Post::new(author.id, "second".to_string(), None, None))
            .await
            .unwrap();

        let texts: Vec<String> = posts
            .list(PostFilter::All, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, ["second", "first", "old"]);

        let window = posts.list(PostFilter::All, 1, 1).await.unwrap();
        assert_eq!(window[0].text, "first");
        assert_eq!(posts.count(PostFilter::All).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_group_filter_isolates_groups() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        let group_a = group(&store, "a").await;
        let group_b = group(&store, "b").await;

        store
            .posts()
            .create(Post::new(author.id, "in a".to_string(), Some(group_a.id), None))
            .await
            .unwrap();

        let posts = store.posts();
        assert_eq!(posts.count(PostFilter::Group(group_a.id)).await.unwrap(), 1);
        assert_eq!(posts.count(PostFilter::Group(group_b.id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_feed_contains_only_followed_authors() {
        let store = InMemoryStore::new();
        let reader = user(&store, "reader").await;
        let followed = user(&store, "followed").await;
        let other = user(&store, "other").await;

        store
            .follows()
            .create(Follow::new(reader.id, followed.id).unwrap())
            .await
            .unwrap();
        store
            .posts()
            .create(Post::new(followed.id, "followed".to_string(), None, None))
            .await
            .unwrap();
        store
            .posts()
            .create(Post::new(other.id, "other".to_string(), None, None))
            .await
            .unwrap();

        let feed = store
            .posts()
            .list(PostFilter::FollowedBy(reader.id), 0, 10)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].author_id, followed.id);

        let empty = store
            .posts()
            .count(PostFilter::FollowedBy(other.id))
            .await
            .unwrap();
        assert_eq!(empty, 0);
    }

    #[tokio::test]
    async fn test_follow_constraints() {
        let store = InMemoryStore::new();
        let reader = user(&store, "reader").await;
        let author = user(&store, "author").await;
        let follows = store.follows();

        follows
            .create(Follow::new(reader.id, author.id).unwrap())
            .await
            .unwrap();
        let duplicate = follows
            .create(Follow::new(reader.id, author.id).unwrap())
            .await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));

        let mut self_follow = Follow::new(reader.id, author.id).unwrap();
        self_follow.author_id = reader.id;
        assert!(matches!(
            follows.create(self_follow).await,
            Err(RepoError::Constraint(_))
        ));

        assert!(follows.is_following(reader.id, author.id).await.unwrap());
        assert_eq!(follows.count_followers(author.id).await.unwrap(), 1);
        assert_eq!(follows.count_following(reader.id).await.unwrap(), 1);

        assert!(follows.delete_pair(reader.id, author.id).await.unwrap());
        assert!(!follows.delete_pair(reader.id, author.id).await.unwrap());
        assert_eq!(follows.count_following(reader.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let store = InMemoryStore::new();
        let author = user(&store, "author").await;
        let reader = user(&store, "reader").await;

        let post = store
            .posts()
            .create(Post::new(author.id, "text".to_string(), None, None))
            .await
            .unwrap();
        store
            .comments()
            .create(Comment::new(post.id, reader.id, "nice".to_string()))
            .await
            .unwrap();
        store
            .follows()
            .create(Follow::new(reader.id, author.id).unwrap())
            .await
            .unwrap();

        store.users().delete(author.id).await.unwrap();

        assert_eq!(store.posts().count(PostFilter::All).await.unwrap(), 0);
        assert!(store.comments().find_by_post(post.id).await.unwrap().is_empty());
        assert_eq!(store.follows().count_following(reader.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deleting_group_keeps_posts() {
        let store = InMemoryStore::new();
        let author = user(&store, "author").await;
        let g = group(&store, "g").await;
        let post = store
            .posts()
            .create(Post::new(author.id, "text".to_string(), Some(g.id), None))
            .await
            .unwrap();

        store.groups().delete(g.id).await.unwrap();

        let post = store.posts().find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(post.group_id, None);
    }

    #[tokio::test]
    async fn test_comments_oldest_first() {
        let store = InMemoryStore::new();
        let author = user(&store, "author").await;
        let post = store
            .posts()
            .create(Post::new(author.id, "text".to_string(), None, None))
            .await
            .unwrap();

        for text in ["one", "two", "three"] {
            store
                .comments()
                .create(Comment::new(post.id, author.id, text.to_string()))
                .await
                .unwrap();
        }

        let texts: Vec<String> = store
            .comments()
            .find_by_post(post.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }
}
