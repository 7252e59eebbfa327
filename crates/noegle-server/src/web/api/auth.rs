use crate::auth::AuthError;
use crate::state::AppState;
use crate::web::api::middleware::{AuthUser, TOKEN_COOKIE};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use noegle_common::models::auth::Credentials;
use serde_json::json;
use std::sync::Arc;

/// POST /signin
///
/// Verifies the posted credentials and hands the session token back as an
/// HttpOnly cookie. Failed attempts get one generic 401 and no cookie.
#[tracing::instrument(skip(state, jar, creds))]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(creds): Json<Credentials>,
) -> impl IntoResponse {
    let session = match state.issuer.issue_session(&creds) {
        Ok(session) => session,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Failed sign-in for '{}'", creds.email);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid email or password"})),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Sign-in error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    // The cookie expiry mirrors the expiry inside the signed claims; the
    // authenticator enforces the latter
    let expires = cookie::time::OffsetDateTime::from_unix_timestamp(session.claims.exp)
        .unwrap_or_else(|_| cookie::time::OffsetDateTime::now_utc());

    let cookie = Cookie::build((TOKEN_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .expires(expires)
        .build();

    tracing::info!("Signed in '{}'", session.claims.email);
    (jar.add(cookie), Json(json!({"status": "ok"}))).into_response()
}

/// GET /validatetoken
///
/// The extractor has already authenticated the caller; echo back who the
/// token says they are.
pub async fn validate_token(auth: AuthUser) -> impl IntoResponse {
    Json(json!({
        "email": auth.0.email,
        "isAdmin": auth.0.is_admin,
    }))
}
