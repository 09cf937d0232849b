//! Account handlers: signup, login and logout.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use yatube_core::domain::User;
use yatube_core::error::RepoError;
use yatube_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use yatube_shared::{FormErrors, LoginForm, SignupForm};

use crate::middleware::auth::{expired_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Where to go after signing in. Only local paths are honoured.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Redirect to `location` carrying a session cookie for `user`.
fn signed_in_redirect(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Found()
        .insert_header((actix_web::http::header::LOCATION, location))
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .finish())
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    views::html(views::users::signup(
        &SignupForm::default(),
        &FormErrors::new(),
    ))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    query: web::Query<NextQuery>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let redisplay = |errors: FormErrors| -> AppResult<HttpResponse> {
        let form = SignupForm {
            password: String::new(),
            password_confirm: String::new(),
            ..form.clone()
        };
        Ok(views::html(views::users::signup(&form, &errors)))
    };

    let (username, password) = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return redisplay(errors),
    };

    if state.users.find_by_username(&username).await?.is_some() {
        let mut errors = FormErrors::new();
        errors.add("username", USERNAME_TAKEN);
        return redisplay(errors);
    }

    let password_hash = state
        .passwords
        .hash(&password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state.users.create(User::new(username, password_hash)).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            return redisplay(errors);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    signed_in_redirect(&state, &user, safe_next(query.next.as_deref()))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let form = LoginForm {
        next: query.into_inner().next,
        ..Default::default()
    };
    views::html(views::users::login(&form, &FormErrors::new()))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let redisplay = |errors: FormErrors| -> AppResult<HttpResponse> {
        let form = LoginForm {
            password: String::new(),
            ..form.clone()
        };
        Ok(views::html(views::users::login(&form, &errors)))
    };

    let (username, password) = match form.clean() {
        Ok(cleaned) => cleaned,
        Err(errors) => return redisplay(errors),
    };

    let Some(user) = state.users.find_by_username(&username).await? else {
        tracing::debug!(username = %username, "Login for unknown user");
        let mut errors = FormErrors::new();
        errors.add_non_field(INVALID_LOGIN);
        return redisplay(errors);
    };

    let valid = state
        .passwords
        .verify(&password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        let mut errors = FormErrors::new();
        errors.add_non_field(INVALID_LOGIN);
        return redisplay(errors);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    signed_in_redirect(&state, &user, safe_next(form.next.as_deref()))
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(actix_web::http::header::ContentType::html())
        .cookie(expired_session_cookie())
        .body(views::users::logged_out())
}
