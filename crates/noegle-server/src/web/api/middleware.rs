use crate::auth::AuthError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use noegle_common::models::auth::Claims;
use serde_json::json;
use std::sync::Arc;

/// Name of the session cookie set on sign-in and read back on every
/// gated request.
pub const TOKEN_COOKIE: &str = "token";

/// Extractor that validates the session cookie and provides the claims.
/// Use `AuthUser` directly for required auth.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(TOKEN_COOKIE).map(|c| c.value());

        match state.authenticator.authenticate(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(err) => Err(reject(err)),
        }
    }
}

/// Convert an auth failure into its HTTP response. A token that is present
/// but does not even decode is a client error (400); every other way a
/// token can fail to authenticate is 401.
pub fn reject(err: AuthError) -> Response {
    let status = match err {
        AuthError::MalformedToken(_) => StatusCode::BAD_REQUEST,
        AuthError::Signing(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    };
    (status, Json(json!({"error": err.to_string()}))).into_response()
}
