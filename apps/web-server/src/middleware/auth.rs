//! Authentication extractors and the session cookie.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use uuid::Uuid;

use yatube_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Login page anonymous visitors are sent to.
pub const LOGIN_URL: &str = "/auth/login/";

/// `LOGIN_URL` with `next` pointing back at `path`. Slashes are left unescaped.
pub fn login_redirect_url(path: &str) -> String {
    format!(
        "{LOGIN_URL}?next={}",
        urlencoding::encode(path).replace("%2F", "/")
    )
}

/// Http-only cookie holding a freshly issued token.
pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .finish()
}

/// Cookie that makes the browser drop the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}

/// Authenticated user identity extractor.
///
/// Handlers that take an `Identity` are login-only: anonymous requests never
/// reach them and are redirected to the login page instead.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Rejected authentication. Responds with a redirect to the login page.
#[derive(Debug)]
pub struct AuthenticationError {
    pub reason: AuthError,
    /// Path and query of the rejected request.
    pub next: String,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect_url(&self.next)))
            .finish()
    }
}

/// Token from the session cookie, or from an `Authorization: Bearer` header.
fn extract_token(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return Err(AuthError::MissingAuth);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl Identity {
    fn authenticate(req: &HttpRequest) -> Result<Self, AuthError> {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return Err(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ));
        };

        let token = extract_token(req)?;
        state.tokens.validate_token(&token).map(Identity::from)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::authenticate(req).map_err(|reason| {
            tracing::debug!(path = %req.path(), reason = %reason, "Login required");
            let next = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.path().to_string());
            AuthenticationError { reason, next }
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(Identity::authenticate(req).ok())))
    }
}
