//! Context assembly for listing and detail pages.
//!
//! Posts are joined with their authors and groups in two batch lookups per
//! page, whatever the page size.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use yatube_core::domain::{Comment, Group, Post, PostFilter};
use yatube_core::ports::{GroupRepository, PostRepository, UserRepository};
use yatube_core::{Page, Paginator};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// A post with the names needed to render it.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub post: Post,
    pub author: String,
    pub group: Option<Group>,
}

/// A comment with its author's username.
#[derive(Debug, Clone)]
pub struct CommentCard {
    pub comment: Comment,
    pub author: String,
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

async fn usernames(state: &AppState, ids: Vec<Uuid>) -> Result<HashMap<Uuid, String>, AppError> {
    Ok(state
        .users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect())
}

/// Join `posts` with their authors and groups, keeping their order.
pub async fn post_cards(state: &AppState, posts: Vec<Post>) -> Result<Vec<PostCard>, AppError> {
    let authors = usernames(state, unique_ids(posts.iter().map(|p| p.author_id))).await?;

    let group_ids = unique_ids(posts.iter().filter_map(|p| p.group_id));
    let groups: HashMap<Uuid, Group> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        state
            .groups
            .find_by_ids(&group_ids)
            .await?
            .into_iter()
            .map(|group| (group.id, group))
            .collect()
    };

    Ok(posts
        .into_iter()
        .map(|post| PostCard {
            author: authors.get(&post.author_id).cloned().unwrap_or_default(),
            group: post.group_id.and_then(|id| groups.get(&id).cloned()),
            post,
        })
        .collect())
}

/// Join `comments` with their authors.
pub async fn comment_cards(
    state: &AppState,
    comments: Vec<Comment>,
) -> Result<Vec<CommentCard>, AppError> {
    let authors = usernames(state, unique_ids(comments.iter().map(|c| c.author_id))).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentCard {
            author: authors.get(&comment.author_id).cloned().unwrap_or_default(),
            comment,
        })
        .collect())
}

/// One page of the posts selected by `filter`, newest first.
///
/// `requested` is the raw `?page=` value.
pub async fn load_post_page(
    state: &AppState,
    filter: PostFilter,
    requested: Option<&str>,
) -> Result<Page<PostCard>, AppError> {
    let total = state.posts.count(filter).await?;
    let paginator = Paginator::new(total, state.settings.posts_per_page);
    let number = paginator.resolve(requested);
    let (offset, limit) = paginator.window(number);

    let posts = if limit == 0 {
        Vec::new()
    } else {
        state.posts.list(filter, offset, limit).await?
    };

    let cards = post_cards(state, posts).await?;
    Ok(paginator.page(number, cards))
}
