//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;

use yatube_core::domain::{Group, Post, PostFilter, User};
use yatube_core::ports::{BaseRepository, FollowRepository, PostRepository, TokenService};
use yatube_infra::{Argon2PasswordService, InMemoryStore};

use web_server::middleware::auth::ACCESS_TOKEN_COOKIE;
use web_server::{AppState, SiteSettings};

/// Mount every route on `$ctx.state` and start the test service.
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .configure(web_server::configure_routes),
        )
        .await
    };
}

/// In-memory store plus the application state built on it.
pub struct TestContext {
    pub store: InMemoryStore,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(SiteSettings::default())
    }

    pub fn with_settings(settings: SiteSettings) -> Self {
        let store = InMemoryStore::new();
        let state = AppState::in_memory(&store, settings);
        Self { store, state }
    }

    pub async fn user(&self, username: &str) -> User {
        self.store
            .users()
            .create(User::new(username.to_string(), Argon2PasswordService::unusable_hash()))
            .await
            .unwrap()
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.store
            .groups()
            .create(Group::new(
                format!("Group {slug}"),
                slug.to_string(),
                format!("About {slug}"),
            ))
            .await
            .unwrap()
    }

    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.store
            .posts()
            .create(Post::new(
                author.id,
                text.to_string(),
                group.map(|g| g.id),
                None,
            ))
            .await
            .unwrap()
    }

    /// Session cookie for `user`.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        Cookie::new(ACCESS_TOKEN_COOKIE, token)
    }

    pub async fn post_count(&self) -> u64 {
        self.store.posts().count(PostFilter::All).await.unwrap()
    }

    pub async fn follow_count(&self, user: &User) -> u64 {
        self.store.follows().count_following(user.id).await.unwrap()
    }
}

/// Template name stamped on the page body.
pub fn template_of(body: &str) -> Option<&str> {
    let start = body.find("data-template=\"")? + "data-template=\"".len();
    let len = body[start..].find('"')?;
    Some(&body[start..start + len])
}

/// Number of post cards on a listing page.
pub fn card_count(body: &str) -> usize {
    body.matches("<article class=\"post\">").count()
}

pub fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn body_text(bytes: actix_web::web::Bytes) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}
