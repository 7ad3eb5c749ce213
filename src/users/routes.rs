// src/users/routes.rs

use crate::users::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/api/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route("/api/users/:id", get(handlers::get_user))
}
