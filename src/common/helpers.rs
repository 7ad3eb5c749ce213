// Helper functions for safe logging and serialization

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Serializes a JSON-encoded list column to an array for API responses
pub fn serialize_string_list<S>(list: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match list {
        Some(list_json) => {
            let entries: Vec<String> =
                serde_json::from_str(list_json).unwrap_or_else(|_| Vec::new());
            entries.serialize(serializer)
        }
        None => Vec::<String>::new().serialize(serializer),
    }
}

/// Deserializes an array to a JSON-encoded list for database storage.
/// An explicit `null` means "leave unset", same as an absent key.
pub fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<String>> = Option::deserialize(deserializer)?;
    match entries {
        Some(entries) => {
            let list_json = serde_json::to_string(&entries).map_err(serde::de::Error::custom)?;
            Ok(Some(list_json))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
    }

    #[test]
    fn test_safe_email_log_handles_garbage() {
        assert_eq!(safe_email_log("x"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }
}
