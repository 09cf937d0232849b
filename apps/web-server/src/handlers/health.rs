//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use yatube_core::domain::PostFilter;
use yatube_core::ports::PostRepository;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.posts.count(PostFilter::All).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check query failed");
            "unavailable"
        }
    };

    let response = HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
