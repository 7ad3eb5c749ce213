// src/users/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{CreateUserRequest, User};
use super::validators::CreateUserValidator;
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState, Validator};

/// POST /api/users - Create a CV owner record
pub async fn create_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;

    let validator = CreateUserValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(errors = ?validation_result.errors, "User creation validation failed");
        return Err(ApiError::from(validation_result));
    }

    let user_id = generate_user_id();

    sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, datetime('now'))")
        .bind(&user_id)
        .bind(&request.name)
        .bind(&request.email)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&request.email),
        "User created successfully"
    );

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users - List CV owners
pub async fn list_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let state = state_lock.read().await;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(users))
}

/// GET /api/users/:id - Fetch a single CV owner
pub async fn get_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
