// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., F_K7NP3X for CV files)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// CV file (F_)
    CvFile,
    /// Extracted info (E_)
    ExtractedInfo,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::CvFile => "F",
            EntityPrefix::ExtractedInfo => "E",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// Returns a string in format "PREFIX_XXXXXX" (e.g., "F_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_cv_file_id() -> String {
    generate_id(EntityPrefix::CvFile)
}

pub fn generate_extracted_info_id() -> String {
    generate_id(EntityPrefix::ExtractedInfo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = generate_cv_file_id();
        assert!(id.starts_with("F_"));
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn test_ids_use_crockford_alphabet() {
        let id = generate_user_id();
        let suffix = id.strip_prefix("U_").unwrap();
        for c in suffix.bytes() {
            assert!(CROCKFORD_ALPHABET.contains(&c), "unexpected char {}", c as char);
        }
    }

    #[test]
    fn test_ids_are_unique_enough() {
        let a = generate_extracted_info_id();
        let b = generate_extracted_info_id();
        assert!(a.starts_with("E_"));
        assert_ne!(a, b);
    }
}
