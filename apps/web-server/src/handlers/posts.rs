//! Post pages: listings, profile, detail, authoring and comments.

use actix_web::{HttpResponse, web};

use yatube_core::domain::{Comment, Post, PostFilter};
use yatube_core::pagination::Paginator;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};
use yatube_shared::{CleanedPost, CommentForm, FormErrors, PostForm};

use super::{PageQuery, parse_post_id, post_url, profile_url, redirect};
use crate::context::{comment_cards, load_post_page, post_cards};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, posts::PostDetailView, posts::ProfileView};

const INVALID_GROUP: &str = "Select a valid choice.";

/// Cache key of one rendered home page.
fn index_cache_key(viewer: &OptionalIdentity, page: u64) -> String {
    let viewer = viewer
        .user_id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anon".to_string());
    format!("index_page:{viewer}:{page}")
}

/// GET / - latest posts, cached per viewer and resolved page number.
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let total = state.posts.count(PostFilter::All).await?;
    let number = Paginator::new(total, state.settings.posts_per_page).resolve(query.page.as_deref());
    let key = index_cache_key(&viewer, number);

    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "Serving cached home page");
        return Ok(views::html(body));
    }

    let number = number.to_string();
    let page = load_post_page(&state, PostFilter::All, Some(&number)).await?;
    let body = views::posts::index(viewer.0.as_ref(), &page);

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.settings.index_cache_ttl))
        .await
    {
        tracing::warn!(key = %key, error = %e, "Failed to cache home page");
    }

    Ok(views::html(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group {slug} not found")))?;

    let page = load_post_page(&state, PostFilter::Group(group.id), query.page.as_deref()).await?;
    Ok(views::html(views::posts::group_list(
        viewer.0.as_ref(),
        &group,
        &page,
    )))
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))?;

    let page = load_post_page(&state, PostFilter::Author(author.id), query.page.as_deref()).await?;

    let following = match viewer.user_id() {
        Some(user_id) if user_id != author.id => {
            state.follows.is_following(user_id, author.id).await?
        }
        _ => false,
    };
    let followers = state.follows.count_followers(author.id).await?;
    let following_count = state.follows.count_following(author.id).await?;

    let view = ProfileView {
        author: &author,
        page: &page,
        following,
        followers,
        following_count,
    };
    Ok(views::html(views::posts::profile(viewer.0.as_ref(), &view)))
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    let author_posts = state.posts.count(PostFilter::Author(post.author_id)).await?;
    let comments = state.comments.find_by_post(post.id).await?;
    let comments = comment_cards(&state, comments).await?;

    let card = post_cards(&state, vec![post])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("Post card lost during assembly".to_string()))?;

    let view = PostDetailView {
        card: &card,
        author_posts,
        comments: &comments,
    };
    Ok(views::html(views::posts::post_detail(
        viewer.0.as_ref(),
        &view,
    )))
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    render_post_form(&state, &identity, &PostForm::default(), &FormErrors::new(), None).await
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let cleaned = match clean_post_form(&state, &form).await? {
        Ok(cleaned) => cleaned,
        Err(errors) => return render_post_form(&state, &identity, &form, &errors, None).await,
    };

    let post = Post::new(
        identity.user_id,
        cleaned.text,
        cleaned.group_id,
        cleaned.image,
    );
    let post = state.posts.create(post).await?;
    tracing::info!(post_id = %post.id, user_id = %identity.user_id, "Post created");

    Ok(redirect(&profile_url(&identity.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect(&post_url(post.id)));
    }

    let form = PostForm::prefilled(&post.text, post.group_id, post.image.as_deref());
    render_post_form(&state, &identity, &form, &FormErrors::new(), Some(&post)).await
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = find_post(&state, &path).await?;
    if !post.is_authored_by(identity.user_id) {
        tracing::warn!(post_id = %post.id, user_id = %identity.user_id, "Edit by non-author refused");
        return Ok(redirect(&post_url(post.id)));
    }

    let form = form.into_inner();
    let cleaned = match clean_post_form(&state, &form).await? {
        Ok(cleaned) => cleaned,
        Err(errors) => {
            return render_post_form(&state, &identity, &form, &errors, Some(&post)).await;
        }
    };

    post.edit(cleaned.text, cleaned.group_id, cleaned.image);
    let post = state.posts.update(post).await?;
    tracing::info!(post_id = %post.id, user_id = %identity.user_id, "Post edited");

    Ok(redirect(&post_url(post.id)))
}

/// GET /posts/{post_id}/comment/ - nothing to show, back to the post.
pub async fn comment_redirect(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;
    Ok(redirect(&post_url(post.id)))
}

/// POST /posts/{post_id}/comment/
///
/// Invalid comments are dropped; the visitor lands on the post either way.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &path).await?;

    match form.clean() {
        Ok(text) => {
            let comment = state
                .comments
                .create(Comment::new(post.id, identity.user_id, text))
                .await?;
            tracing::info!(
                post_id = %post.id,
                comment_id = %comment.id,
                user_id = %identity.user_id,
                "Comment added"
            );
        }
        Err(errors) => {
            tracing::debug!(post_id = %post.id, ?errors, "Empty comment ignored");
        }
    }

    Ok(redirect(&post_url(post.id)))
}

async fn find_post(state: &AppState, raw_id: &str) -> AppResult<Post> {
    let post_id = parse_post_id(raw_id)?;
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
}

/// Validate a post form, including that the chosen group exists.
///
/// The outer error is a failed lookup; the inner one carries form errors to
/// redisplay.
async fn clean_post_form(
    state: &AppState,
    form: &PostForm,
) -> AppResult<Result<CleanedPost, FormErrors>> {
    let cleaned = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return Ok(Err(errors)),
    };

    if let Some(group_id) = cleaned.group_id {
        if state.groups.find_by_id(group_id).await?.is_none() {
            let mut errors = FormErrors::new();
            errors.add("group", INVALID_GROUP);
            return Ok(Err(errors));
        }
    }

    Ok(Ok(cleaned))
}

async fn render_post_form(
    state: &AppState,
    identity: &Identity,
    form: &PostForm,
    errors: &FormErrors,
    editing: Option<&Post>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;
    Ok(views::html(views::posts::create_post(
        Some(identity),
        form,
        errors,
        &groups,
        editing.map(|post| post.id),
    )))
}
