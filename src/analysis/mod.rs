// Analysis module - document text extraction and heuristic field extraction

pub mod document;
pub mod fields;

// Re-export commonly used items
pub use document::{CvAnalyzer, DocumentFormat, ExtractError};
pub use fields::{CandidateRecord, FieldExtractor, InputError};
