//! HTTP handlers and route configuration.

mod auth;
mod follow;
mod health;
mod posts;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};

/// `?page=` of listing pages, kept raw for the paginator.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 302 to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

pub(crate) fn post_url(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

/// Post ID from a path segment. Malformed IDs are unknown posts.
pub(crate) fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Post {raw} not found")))
}

async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    tracing::debug!(path = %req.path(), "No route matched");
    Err(AppError::NotFound(format!(
        "The page {} does not exist.",
        req.path()
    )))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        // Public pages
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        // Authoring
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .service(
            web::resource("/posts/{post_id}/comment/")
                .route(web::get().to(posts::comment_redirect))
                .route(web::post().to(posts::add_comment)),
        )
        // Subscriptions
        .route("/follow/", web::get().to(follow::follow_index))
        .route(
            "/profile/{username}/follow/",
            web::get().to(follow::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(follow::profile_unfollow),
        )
        // Accounts
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::get().to(auth::logout)),
        )
        .default_service(web::to(not_found));
}
