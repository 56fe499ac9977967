//! Auth routes — registration, login, profile, session management.

use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use uuid::Uuid;

use crate::services::accounts::{self, AccountError, NewAccount, ProfileRecord, ProfileUpdate};
use crate::services::session;
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";
const SESSION_DAYS: i64 = 30;

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

/// Pull a token out of an `Authorization: Bearer` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated account extracted from a bearer token or session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub profile_id: Uuid,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers) {
            Some(token) => token.to_owned(),
            None => {
                let jar = CookieJar::from_headers(&parts.headers);
                jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default().to_owned()
            }
        };
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let profile_id = session::validate_session(&app_state.pool, &token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { profile_id, token })
    }
}

pub(crate) fn account_error_to_status(err: AccountError) -> StatusCode {
    match err {
        AccountError::InvalidEmail | AccountError::EmailTaken => StatusCode::BAD_REQUEST,
        AccountError::NotFound(_) => StatusCode::NOT_FOUND,
        AccountError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
}

/// `POST /api/auth/register` — create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<ProfileRecord>), StatusCode> {
    if body.password.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let profile = accounts::register(
        &state.pool,
        NewAccount {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            institution: body.institution,
            department: body.department,
        },
    )
    .await
    .map_err(|e| {
        if matches!(&e, AccountError::Database(_)) {
            tracing::error!(error = %e, "registration failed");
        }
        account_error_to_status(e)
    })?;

    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::days(SESSION_DAYS))
        .build()
}

/// `POST /api/auth/login` — verify credentials and mint a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<(CookieJar, Json<TokenResponse>), StatusCode> {
    let credentials = accounts::find_credentials(&state.pool, &body.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "credential lookup failed");
            account_error_to_status(e)
        })?;

    let Some((profile_id, password_hash)) = credentials else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if !session::verify_password(&body.password, &password_hash) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = session::create_session(&state.pool, profile_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "session creation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let jar = CookieJar::new().add(session_cookie(token.clone()));
    Ok((jar, Json(TokenResponse { access_token: token, token_type: "bearer" })))
}

/// `GET /api/auth/me` — current account profile.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ProfileRecord>, StatusCode> {
    let profile = accounts::get_profile(&state.pool, auth.profile_id)
        .await
        .map_err(account_error_to_status)?;
    Ok(Json(profile))
}

/// `PUT /api/auth/me` — update the current account profile.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileRecord>, StatusCode> {
    let profile = accounts::update_profile(&state.pool, auth.profile_id, update)
        .await
        .map_err(account_error_to_status)?;
    Ok(Json(profile))
}

/// `POST /api/auth/logout` — delete the session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), StatusCode> {
    session::delete_session(&state.pool, &auth.token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let jar = jar.remove(Cookie::build(COOKIE_NAME).path("/"));
    Ok((jar, Json(serde_json::json!({ "ok": true }))))
}

#[derive(Deserialize)]
pub struct ResetPasswordBody {
    #[allow(dead_code)]
    pub email: String,
}

/// `POST /api/auth/reset-password` — neutral reply regardless of whether
/// the address is registered.
pub async fn reset_password(Json(_body): Json<ResetPasswordBody>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "If your email is registered, you will receive a password reset link"
    }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
