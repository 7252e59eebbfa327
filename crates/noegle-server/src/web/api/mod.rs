pub mod auth;
pub mod middleware;
pub mod users;

use crate::state::AppState;
use axum::response::IntoResponse;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// GET /status -- public health check
async fn status() -> impl IntoResponse {
    "API is up and running"
}

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/status", get(status))
        .route("/signin", post(auth::signin))
        // Token-gated endpoints (the handlers take an AuthUser)
        .route("/validatetoken", get(auth::validate_token))
        .route("/users", get(users::list_users))
        // Registration is public; update requires an admin token
        .route("/user", put(users::register_user).post(users::update_user))
        .route(
            "/user/{email}",
            get(users::get_user).delete(users::delete_user),
        )
        .with_state(state)
}
