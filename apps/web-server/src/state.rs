//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    Cache, CommentRepository, FollowRepository, GroupRepository, PasswordService,
    PostRepository, TokenService, UserRepository,
};
use yatube_infra::auth::PasswordConfig;
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService,
};

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    DatabaseConfig, DatabaseConnections, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::{AppConfig, SiteSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub settings: SiteSettings,
}

/// One implementation of every repository port.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            groups: Arc::new(store.groups()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            follows: Arc::new(store.follows()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repositories = Self::build_repositories(config).await;
        let cache = Self::build_cache(config).await;

        tracing::info!(
            posts_per_page = config.site.posts_per_page,
            index_cache_ttl_secs = config.site.index_cache_ttl.as_secs(),
            "Application state initialized"
        );

        let passwords = Argon2PasswordService::with_config(PasswordConfig::from_env())
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Invalid password hashing parameters. Using defaults.");
                Argon2PasswordService::new()
            });

        Self::from_parts(
            repositories,
            cache,
            Arc::new(JwtTokenService::from_env()),
            Arc::new(passwords),
            config.site.clone(),
        )
    }

    /// State backed by `store`, an in-process cache, a default JWT key and
    /// the cheapest password hashing parameters.
    pub fn in_memory(store: &InMemoryStore, settings: SiteSettings) -> Self {
        let passwords = Argon2PasswordService::with_config(PasswordConfig::insecure_fast())
            .unwrap_or_default();

        Self::from_parts(
            Repositories::in_memory(store),
            Arc::new(InMemoryCache::new()),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            Arc::new(passwords),
            settings,
        )
    }

    fn from_parts(
        repositories: Repositories,
        cache: Arc<dyn Cache>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        settings: SiteSettings,
    ) -> Self {
        Self {
            users: repositories.users,
            groups: repositories.groups,
            posts: repositories.posts,
            comments: repositories.comments,
            follows: repositories.follows,
            cache,
            tokens,
            passwords,
            settings,
        }
    }

    #[cfg(feature = "postgres")]
    async fn build_repositories(config: &AppConfig) -> Repositories {
        let Some(settings) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory(&InMemoryStore::new());
        };

        let db_config = DatabaseConfig {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
        };
        match DatabaseConnections::init(&db_config).await {
            Ok(connections) => Repositories::postgres(&connections),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to connect to database. Using in-memory fallback."
                );
                Repositories::in_memory(&InMemoryStore::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Repositories::in_memory(&InMemoryStore::new())
    }

    #[cfg(feature = "redis")]
    async fn build_cache(config: &AppConfig) -> Arc<dyn Cache> {
        use yatube_infra::{RedisCache, RedisConfig};

        let Some(url) = &config.redis_url else {
            return Arc::new(InMemoryCache::new());
        };

        let redis_config = RedisConfig {
            url: url.clone(),
            ..RedisConfig::from_env()
        };
        match RedisCache::new(redis_config).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis. Using in-memory cache.");
                Arc::new(InMemoryCache::new())
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn build_cache(config: &AppConfig) -> Arc<dyn Cache> {
        if config.redis_url.is_some() {
            tracing::warn!("REDIS_URL set but the redis feature is disabled; using in-memory cache");
        }
        Arc::new(InMemoryCache::new())
    }
}
