// src/cv/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::{deserialize_string_list, serialize_string_list};

// ============================================================================
// CV File Models
// ============================================================================

#[derive(FromRow, Serialize, Debug)]
pub struct CvFile {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub file_size: i64,
    // Raw extracted text is kept for audit but not echoed on the wire
    #[serde(skip_serializing)]
    pub extracted_text: String,
    pub uploaded_at: Option<String>,
}

// ============================================================================
// Extracted Info Models
// ============================================================================

/// Persisted snapshot of the structured fields extracted from a CV.
/// List-valued columns are stored as JSON text and serialized back to
/// arrays in API responses.
#[derive(FromRow, Serialize, Debug)]
pub struct ExtractedInfo {
    pub id: String,
    pub cv_file_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(serialize_with = "serialize_string_list")]
    pub education: Option<String>,
    #[serde(serialize_with = "serialize_string_list")]
    pub experience: Option<String>,
    #[serde(serialize_with = "serialize_string_list")]
    pub skills: Option<String>,
    #[serde(serialize_with = "serialize_string_list")]
    pub languages: Option<String>,
    #[serde(skip_serializing)]
    pub raw_json: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Partial update for extracted info. Every updatable field is explicitly
/// listed here; unknown JSON keys are ignored by serde, so nothing outside
/// this allow-list can be written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExtractedInfoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub skills: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub languages: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CvSummary {
    pub id: String,
    pub filename: String,
    pub uploaded_at: Option<String>,
    pub file_size: i64,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub user_id: Option<String>,
}
