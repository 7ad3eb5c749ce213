// src/cv/handlers/info.rs

use axum::extract::{Extension, Json, Path};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::common::{ApiError, AppState, Validator};
use crate::cv::models::{CvFile, CvSummary, ExtractedInfo, UpdateExtractedInfoRequest};
use crate::cv::validators::UpdateExtractedInfoValidator;

/// GET /api/cv/:id - Get stored file metadata and the extracted record
pub async fn get_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(cv_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await;

    let cv_file = sqlx::query_as::<_, CvFile>("SELECT * FROM cv_files WHERE id = ?")
        .bind(&cv_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("CV not found".to_string()))?;

    let extracted_info =
        sqlx::query_as::<_, ExtractedInfo>("SELECT * FROM extracted_info WHERE cv_file_id = ?")
            .bind(&cv_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| {
                ApiError::NotFound("Extracted information not found".to_string())
            })?;

    Ok(Json(json!({
        "cv_file": cv_file,
        "extracted_info": extracted_info,
    })))
}

/// PATCH /api/cv/:id - Partially update the extracted record
///
/// Only the allow-listed fields of `UpdateExtractedInfoRequest` can change;
/// unknown keys in the request body are ignored silently.
pub async fn update_cv_info(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(cv_id): Path<String>,
    Json(request): Json<UpdateExtractedInfoRequest>,
) -> Result<Json<ExtractedInfo>, ApiError> {
    let state = state_lock.read().await;

    let validator = UpdateExtractedInfoValidator;
    let validation_result = validator.validate(&request);
    if !validation_result.is_valid {
        warn!(
            cv_id = %cv_id,
            errors = ?validation_result.errors,
            "Extracted info update validation failed"
        );
        return Err(ApiError::from(validation_result));
    }

    let existing = sqlx::query_as::<_, ExtractedInfo>(
        "SELECT * FROM extracted_info WHERE cv_file_id = ?",
    )
    .bind(&cv_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if existing.is_none() {
        return Err(ApiError::NotFound(
            "Extracted information not found".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE extracted_info
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            phone = COALESCE(?, phone),
            address = COALESCE(?, address),
            education = COALESCE(?, education),
            experience = COALESCE(?, experience),
            skills = COALESCE(?, skills),
            languages = COALESCE(?, languages),
            updated_at = datetime('now')
        WHERE cv_file_id = ?
        "#,
    )
    .bind(request.name.as_deref())
    .bind(request.email.as_deref())
    .bind(request.phone.as_deref())
    .bind(request.address.as_deref())
    .bind(request.education.as_deref())
    .bind(request.experience.as_deref())
    .bind(request.skills.as_deref())
    .bind(request.languages.as_deref())
    .bind(&cv_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let updated = sqlx::query_as::<_, ExtractedInfo>(
        "SELECT * FROM extracted_info WHERE cv_file_id = ?",
    )
    .bind(&cv_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(cv_id = %cv_id, "Extracted info updated successfully");

    Ok(Json(updated))
}

/// GET /api/cvs - List uploaded CV summaries
pub async fn list_cvs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<CvSummary>>, ApiError> {
    let state = state_lock.read().await;

    let summaries = sqlx::query_as::<_, CvSummary>(
        r#"
        SELECT cv_files.id, cv_files.filename, cv_files.uploaded_at,
               cv_files.file_size, extracted_info.name, extracted_info.email
        FROM cv_files
        LEFT JOIN extracted_info ON extracted_info.cv_file_id = cv_files.id
        ORDER BY cv_files.uploaded_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(summaries))
}
