//! Subscriptions: the follow feed and follow/unfollow actions.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{Follow, PostFilter, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, FollowRepository, UserRepository};

use super::{PageQuery, profile_url, redirect};
use crate::context::load_post_page;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// GET /follow/ - posts of the authors the viewer follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = load_post_page(
        &state,
        PostFilter::FollowedBy(identity.user_id),
        query.page.as_deref(),
    )
    .await?;
    Ok(views::html(views::posts::follow(Some(&identity), &page)))
}

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))
}

/// GET /profile/{username}/follow/
///
/// Following yourself or someone you already follow changes nothing.
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path).await?;

    if author.id != identity.user_id
        && !state.follows.is_following(identity.user_id, author.id).await?
    {
        let follow = Follow::new(identity.user_id, author.id)?;
        match state.follows.create(follow).await {
            Ok(_) => {
                tracing::info!(user_id = %identity.user_id, author = %author.username, "Followed");
            }
            // Lost a race against a concurrent follow of the same pair.
            Err(RepoError::Constraint(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(redirect(&profile_url(&author.username)))
}

/// GET /profile/{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path).await?;

    if state.follows.delete_pair(identity.user_id, author.id).await? {
        tracing::info!(user_id = %identity.user_id, author = %author.username, "Unfollowed");
    }

    Ok(redirect(&profile_url(&author.username)))
}
