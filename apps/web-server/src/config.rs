//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use yatube_core::pagination::DEFAULT_PAGE_SIZE;

/// Blog-level settings read by the page handlers.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Posts shown per listing page.
    pub posts_per_page: u64,
    /// Lifetime of a cached home page.
    pub index_cache_ttl: Duration,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_PAGE_SIZE,
            index_cache_ttl: Duration::from_secs(20),
        }
    }
}

/// Connection settings for the PostgreSQL database.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on in-memory repositories.
    pub database: Option<DatabaseSettings>,
    /// `None` keeps the page cache in process.
    pub redis_url: Option<String>,
    pub site: SiteSettings,
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let defaults = SiteSettings::default();
        let site = SiteSettings {
            posts_per_page: parsed::<u64>("POSTS_PER_PAGE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            index_cache_ttl: parsed("INDEX_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.index_cache_ttl),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            site,
        }
    }
}
