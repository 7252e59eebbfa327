use crate::auth::hash_password;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use noegle_common::models::user::User;
use noegle_directory::{DirectoryError, UserDirectory, UserRecord};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    /// When omitted the stored password hash is kept as-is
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// GET /users
#[tracing::instrument(skip(state, _auth))]
pub async fn list_users(State(state): State<Arc<AppState>>, _auth: AuthUser) -> impl IntoResponse {
    let users: Vec<User> = state.directory.list().iter().map(User::from).collect();
    Json(users)
}

/// GET /user/{email}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(email): Path<String>,
) -> impl IntoResponse {
    match state.directory.lookup(&email) {
        Some(record) => Json(User::from(&record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("user '{}' not found", email)})),
        )
            .into_response(),
    }
}

/// PUT /user -- public registration. The record carries no admin bit;
/// sessions are admin iff the signin email matches the configured admin
/// account, so this stays non-admin unless the admin record was deleted
/// and its email re-registered here.
#[tracing::instrument(skip(state, req))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    let now = Utc::now();
    let record = UserRecord {
        email: req.email.clone(),
        first_name: req.first_name,
        last_name: req.last_name,
        password_hash,
        created_at: now,
        modified_at: now,
    };

    match state.directory.insert(record) {
        Ok(()) => {
            tracing::info!("Registered user '{}'", req.email);
            (StatusCode::CREATED, Json(json!({"status": "created"}))).into_response()
        }
        Err(DirectoryError::AlreadyExists(email)) => (
            StatusCode::CONFLICT,
            Json(json!({"error": format!("user '{}' already exists", email)})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to register user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// POST /user -- admin-only update of names and password
#[tracing::instrument(skip(state, auth, req))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if !auth.0.is_admin {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Admin privileges required"})),
        )
            .into_response();
    }

    let existing = match state.directory.lookup(&req.email) {
        Some(record) => record,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": format!("user '{}' not found", req.email)})),
            )
                .into_response();
        }
    };

    let password_hash = match req.password {
        Some(ref password) => match hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Failed to hash password: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Internal server error"})),
                )
                    .into_response();
            }
        },
        None => existing.password_hash.clone(),
    };

    let record = UserRecord {
        email: existing.email,
        first_name: req.first_name,
        last_name: req.last_name,
        password_hash,
        created_at: existing.created_at,
        modified_at: Utc::now(),
    };

    match state.directory.update(record) {
        Ok(()) => {
            tracing::info!("Updated user '{}'", req.email);
            Json(json!({"status": "updated"})).into_response()
        }
        Err(DirectoryError::NotFound(email)) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("user '{}' not found", email)})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// DELETE /user/{email} -- admin only
#[tracing::instrument(skip(state, auth))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> impl IntoResponse {
    if !auth.0.is_admin {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Admin privileges required"})),
        )
            .into_response();
    }

    match state.directory.remove(&email) {
        Ok(_) => {
            tracing::info!("Deleted user '{}'", email);
            Json(json!({"status": "deleted"})).into_response()
        }
        Err(DirectoryError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("user '{}' not found", email)})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}
