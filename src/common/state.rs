// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::analysis::{CvAnalyzer, FieldExtractor};

/// Application state containing the database pool and the document
/// processing services. The extractors are stateless; they live here so
/// handlers receive them by dependency passing instead of globals.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub analyzer: Arc<CvAnalyzer>,
    pub field_extractor: Arc<FieldExtractor>,
}
