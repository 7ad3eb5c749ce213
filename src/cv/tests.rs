//! Tests for the cv module
//!
//! These tests verify:
//! - ExtractedInfo list-column serialization
//! - Partial-update request parsing (allow-list semantics)
//! - Update validation

#[cfg(test)]
mod tests {
    use super::super::models::{self, ExtractedInfo, UpdateExtractedInfoRequest};
    use super::super::validators::{is_plausible_email, UpdateExtractedInfoValidator};
    use crate::common::Validator;

    fn sample_info() -> ExtractedInfo {
        ExtractedInfo {
            id: "E_TESTID".to_string(),
            cv_file_id: "F_TESTID".to_string(),
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            address: None,
            education: Some(r#"["B.Sc. Computer Science"]"#.to_string()),
            experience: Some(r#"["Engineer at Initech"]"#.to_string()),
            skills: Some(r#"["Rust","SQL"]"#.to_string()),
            languages: Some("[]".to_string()),
            raw_json: None,
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_extracted_info_serializes_lists_as_arrays() {
        let value = serde_json::to_value(sample_info()).unwrap();
        assert_eq!(value["skills"], serde_json::json!(["Rust", "SQL"]));
        assert_eq!(value["languages"], serde_json::json!([]));
        // Raw audit text stays off the wire
        assert!(value.get("raw_json").is_none());
    }

    #[test]
    fn test_update_request_parses_lists_to_json_columns() {
        let request: UpdateExtractedInfoRequest =
            serde_json::from_str(r#"{"skills": ["Rust", "Go"], "name": "Jane"}"#).unwrap();
        assert_eq!(request.skills.as_deref(), Some(r#"["Rust","Go"]"#));
        assert_eq!(request.name.as_deref(), Some("Jane"));
        assert_eq!(request.email, None);
        assert_eq!(request.education, None);
    }

    #[test]
    fn test_update_request_ignores_unknown_keys() {
        // Field injection attempts outside the allow-list must parse cleanly
        // and touch nothing
        let request: UpdateExtractedInfoRequest = serde_json::from_str(
            r#"{"email": "new@example.com", "cv_file_id": "F_EVIL", "is_admin": true}"#,
        )
        .unwrap();
        assert_eq!(request.email.as_deref(), Some("new@example.com"));
        assert_eq!(request.name, None);
        assert_eq!(request.skills, None);
    }

    #[test]
    fn test_update_request_accepts_null_list_as_unset() {
        // An explicit null must parse like an absent key, not fail parsing
        let request: UpdateExtractedInfoRequest =
            serde_json::from_str(r#"{"skills": null, "email": "new@example.com"}"#).unwrap();
        assert_eq!(request.skills, None);
        assert_eq!(request.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_update_validation_accepts_partial_body() {
        let request = UpdateExtractedInfoRequest {
            skills: Some(r#"["Rust"]"#.to_string()),
            ..Default::default()
        };
        let result = UpdateExtractedInfoValidator.validate(&request);
        assert!(result.is_valid);
    }

    #[test]
    fn test_update_validation_rejects_malformed_email() {
        let request = UpdateExtractedInfoRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        let result = UpdateExtractedInfoValidator.validate(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "email"));
    }

    #[test]
    fn test_plausible_email_pattern() {
        assert!(is_plausible_email("jane.doe@example.com"));
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("jane@"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("jane@example"));
        assert!(!is_plausible_email("jane doe@example.com"));
    }

    async fn test_pool() -> sqlx::SqlitePool {
        // One connection: every pooled connection to :memory: would
        // otherwise see its own empty database
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::common::migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn seed_cv(pool: &sqlx::SqlitePool, cv_id: &str, filename: &str, email: &str) {
        sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
            .bind(format!("U_{}", cv_id))
            .bind("Jane Doe")
            .bind(email)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO cv_files (id, user_id, filename, file_size, extracted_text) VALUES (?, ?, ?, 1024, 'raw text')",
        )
        .bind(cv_id)
        .bind(format!("U_{}", cv_id))
        .bind(filename)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            r#"
            INSERT INTO extracted_info (id, cv_file_id, name, email, skills)
            VALUES (?, ?, 'Jane Doe', ?, '["Rust"]')
            "#,
        )
        .bind(format!("E_{}", cv_id))
        .bind(cv_id)
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_stored_record_roundtrips_by_cv_id() {
        let pool = test_pool().await;
        seed_cv(&pool, "F_AAAAAA", "resume.pdf", "jane@example.com").await;

        let info = sqlx::query_as::<_, ExtractedInfo>(
            "SELECT * FROM extracted_info WHERE cv_file_id = ?",
        )
        .bind("F_AAAAAA")
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(info.skills.as_deref(), Some(r#"["Rust"]"#));
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_named_fields() {
        let pool = test_pool().await;
        seed_cv(&pool, "F_BBBBBB", "resume.pdf", "jane@example.com").await;

        // Same COALESCE statement shape the PATCH handler issues
        sqlx::query(
            r#"
            UPDATE extracted_info
            SET email = COALESCE(?, email),
                skills = COALESCE(?, skills)
            WHERE cv_file_id = ?
            "#,
        )
        .bind(None::<String>)
        .bind(Some(r#"["Rust","Go"]"#))
        .bind("F_BBBBBB")
        .execute(&pool)
        .await
        .unwrap();

        let info = sqlx::query_as::<_, ExtractedInfo>(
            "SELECT * FROM extracted_info WHERE cv_file_id = ?",
        )
        .bind("F_BBBBBB")
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(info.skills.as_deref(), Some(r#"["Rust","Go"]"#));
        assert_eq!(
            info.email.as_deref(),
            Some("jane@example.com"),
            "updating skills alone must leave email unchanged"
        );
    }

    #[tokio::test]
    async fn test_listing_returns_summary_per_upload() {
        let pool = test_pool().await;
        seed_cv(&pool, "F_CCCCCC", "first.pdf", "first@example.com").await;
        seed_cv(&pool, "F_DDDDDD", "second.docx", "second@example.com").await;

        let summaries = sqlx::query_as::<_, models::CvSummary>(
            r#"
            SELECT cv_files.id, cv_files.filename, cv_files.uploaded_at,
                   cv_files.file_size, extracted_info.name, extracted_info.email
            FROM cv_files
            LEFT JOIN extracted_info ON extracted_info.cv_file_id = cv_files.id
            ORDER BY cv_files.id
            "#,
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].filename, "first.pdf");
        assert_eq!(summaries[0].email.as_deref(), Some("first@example.com"));
        assert_eq!(summaries[1].filename, "second.docx");
        assert_eq!(summaries[1].email.as_deref(), Some("second@example.com"));
    }

    // ------------------------------------------------------------------
    // HTTP-level tests: the router wired the way main() wires it
    // ------------------------------------------------------------------

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "cv-upload-test-boundary";

    async fn test_app() -> axum::Router {
        let state = crate::common::AppState {
            db: test_pool().await,
            analyzer: Arc::new(crate::analysis::CvAnalyzer::new()),
            field_extractor: Arc::new(crate::analysis::FieldExtractor::new()),
        };
        super::super::cv_routes()
            .layer(axum::Extension(Arc::new(tokio::sync::RwLock::new(state))))
    }

    fn multipart_upload(filename: Option<&str>, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match filename {
            Some(name) => format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\r\n"
            ),
            None => "Content-Disposition: form-data; name=\"file\"\r\n\r\n".to_string(),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_without_filename_is_rejected() {
        let app = test_app().await;
        let docx = crate::analysis::document::docx_fixture(&["Jane Doe"]);

        let response = app.oneshot(multipart_upload(None, &docx)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_upload_then_fetch_roundtrip() {
        let app = test_app().await;
        let docx = crate::analysis::document::docx_fixture(&[
            "Jane Doe",
            "Email: jane.doe@example.com",
            "Skills",
            "Rust, SQL",
        ]);

        let response = app
            .clone()
            .oneshot(multipart_upload(Some("resume.docx"), &docx))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded = json_body(response).await;
        assert_eq!(uploaded["data"]["email"], "jane.doe@example.com");
        let cv_id = uploaded["cv_file_id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/cv/{cv_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = json_body(response).await;
        assert_eq!(fetched["extracted_info"]["name"], "Jane Doe");
        assert_eq!(fetched["extracted_info"]["email"], "jane.doe@example.com");
        assert_eq!(
            fetched["extracted_info"]["skills"],
            serde_json::json!(["Rust", "SQL"])
        );

        // Every stored timestamp comes from SQLite's datetime('now'), so
        // string ORDER BY over uploaded_at stays consistent across rows
        let uploaded_at = fetched["cv_file"]["uploaded_at"].as_str().unwrap();
        assert!(
            !uploaded_at.contains('T'),
            "unexpected timestamp format: {uploaded_at}"
        );
    }

    #[test]
    fn test_cv_summary_structure() {
        let summary = models::CvSummary {
            id: "F_TESTID".to_string(),
            filename: "resume.pdf".to_string(),
            uploaded_at: Some("2024-01-01T00:00:00Z".to_string()),
            file_size: 2048,
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["filename"], "resume.pdf");
        assert_eq!(value["email"], "jane@example.com");
    }
}
