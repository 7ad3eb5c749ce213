// src/cv/handlers/upload.rs

use axum::{
    extract::{Extension, Multipart, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analysis::DocumentFormat;
use crate::common::{
    generate_cv_file_id, generate_extracted_info_id, generate_user_id, safe_email_log, ApiError,
    AppState,
};
use crate::cv::models::UploadQuery;

/// POST /api/upload - Upload and analyze a CV file
///
/// Extracts text, runs field extraction and persists user, file record and
/// extracted info inside one transaction: a failure anywhere leaves no
/// partial state behind. Processing is in-memory; no temp files are
/// written.
pub async fn upload_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart body".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|name| name.to_string())
            .ok_or_else(|| {
                ApiError::BadRequest("Uploaded file has no filename".to_string())
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;

        let format = DocumentFormat::from_filename(&filename).map_err(|e| {
            warn!(filename = %filename, "Rejected upload with unsupported extension");
            ApiError::from(e)
        })?;

        info!(
            filename = %filename,
            file_size = data.len(),
            format = format.as_str(),
            "Processing CV upload"
        );

        let extracted_text = state.analyzer.extract_text(&data, format)?;

        let record = state
            .field_extractor
            .analyze(&extracted_text)
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        if let Some(email) = &record.email {
            info!(email = %safe_email_log(email), "Contact email identified in CV");
        }

        // ====================================================================
        // PERSISTENCE (all-or-nothing)
        // ====================================================================

        let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

        let user_id = match &params.user_id {
            Some(id) => {
                let existing: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM users WHERE id = ?")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(ApiError::DatabaseError)?;
                existing
                    .map(|row| row.0)
                    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
            }
            None => {
                let id = generate_user_id();
                sqlx::query(
                    "INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, datetime('now'))",
                )
                .bind(&id)
                .bind(record.name.as_deref().unwrap_or("Unknown"))
                .bind(record.email.as_deref().unwrap_or(""))
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;
                id
            }
        };

        let cv_file_id = generate_cv_file_id();
        sqlx::query(
            r#"
            INSERT INTO cv_files (id, user_id, filename, file_size, extracted_text, uploaded_at)
            VALUES (?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(&cv_file_id)
        .bind(&user_id)
        .bind(&filename)
        .bind(data.len() as i64)
        .bind(&extracted_text)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        let extracted_info_id = generate_extracted_info_id();
        sqlx::query(
            r#"
            INSERT INTO extracted_info
                (id, cv_file_id, name, email, phone, address,
                 education, experience, skills, languages, raw_json,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
            "#,
        )
        .bind(&extracted_info_id)
        .bind(&cv_file_id)
        .bind(record.name.as_deref())
        .bind(record.email.as_deref())
        .bind(record.phone.as_deref())
        .bind(record.address.as_deref())
        .bind(json!(&record.education).to_string())
        .bind(json!(&record.experience).to_string())
        .bind(json!(&record.skills).to_string())
        .bind(json!(&record.languages).to_string())
        .bind(json!(&record).to_string())
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

        tx.commit().await.map_err(ApiError::DatabaseError)?;

        info!(
            cv_file_id = %cv_file_id,
            extracted_info_id = %extracted_info_id,
            user_id = %user_id,
            "CV uploaded and analyzed successfully"
        );

        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "CV uploaded and analyzed successfully",
                "cv_file_id": cv_file_id,
                "extracted_info_id": extracted_info_id,
                "user_id": user_id,
                "data": record,
            })),
        ));
    }

    Err(ApiError::BadRequest("No CV file provided".to_string()))
}
