// src/cv/routes.rs

use crate::cv::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn cv_routes() -> Router {
    Router::new()
        // Upload-and-analyze route
        .route("/api/upload", post(handlers::upload_cv))
        // Stored CV routes
        .route(
            "/api/cv/:id",
            get(handlers::get_cv).patch(handlers::update_cv_info),
        )
        .route("/api/cvs", get(handlers::list_cvs))
}
