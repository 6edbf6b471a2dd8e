//! Player identity and input validation

use std::collections::HashSet;

/// Identity validation errors with helpful messages
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Value is empty")]
    Empty,

    #[error("Value is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Value cannot start or end with whitespace")]
    InvalidWhitespace,

    #[error("Value contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("Value contains path separators (/ or \\)")]
    PathTraversal,

    #[error("Value is a reserved name")]
    Reserved,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Input exceeds limit ({limit} bytes)")]
    TooLarge { limit: usize },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

pub const MAX_PLAYER_ID_LEN: usize = 64;
pub const MAX_DISPLAY_NAME_LEN: usize = 40;

/// Get set of reserved ids that should not be used as save keys
fn reserved_ids() -> HashSet<&'static str> {
    ["guest", "admin", "root", "system", "con", "prn", "aux", "nul"]
        .iter()
        .copied()
        .collect()
}

/// Validate a player id used as the save key. Ids are ASCII letters, digits,
/// `-`, `_` and `.`; comparisons elsewhere are case-insensitive.
pub fn validate_player_id(id: &str) -> Result<String, IdentityError> {
    if id.is_empty() {
        return Err(IdentityError::Empty);
    }
    if id.trim() != id {
        return Err(IdentityError::InvalidWhitespace);
    }
    if id.chars().count() > MAX_PLAYER_ID_LEN {
        return Err(IdentityError::TooLong {
            max: MAX_PLAYER_ID_LEN,
        });
    }
    if id.contains("..") || id.contains('/') || id.contains('\\') {
        return Err(IdentityError::PathTraversal);
    }
    if reserved_ids().contains(id.to_ascii_lowercase().as_str()) {
        return Err(IdentityError::Reserved);
    }

    let invalid: HashSet<char> = id
        .chars()
        .filter(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.'))
        .collect();
    if !invalid.is_empty() {
        return Err(IdentityError::InvalidCharacters {
            chars: invalid.into_iter().collect(),
        });
    }

    Ok(id.to_string())
}

/// Validate a display name. Unicode and spaces are allowed; control
/// characters are not.
pub fn validate_display_name(name: &str) -> Result<String, IdentityError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::Empty);
    }
    if trimmed != name {
        return Err(IdentityError::InvalidWhitespace);
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(IdentityError::TooLong {
            max: MAX_DISPLAY_NAME_LEN,
        });
    }
    if trimmed.chars().any(|c| c.is_control()) {
        let control_chars: String = trimmed
            .chars()
            .filter(|c| c.is_control())
            .map(|c| format!("\\u{{{:04x}}}", c as u32))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(IdentityError::InvalidCharacters {
            chars: control_chars,
        });
    }
    Ok(trimmed.to_string())
}

/// Parse JSON with a size limit
pub fn secure_json_parse<T>(content: &str, max_bytes: usize) -> Result<T, InputError>
where
    T: serde::de::DeserializeOwned,
{
    if content.len() > max_bytes {
        return Err(InputError::TooLarge { limit: max_bytes });
    }

    // Valid JSON cannot start with NUL; strip leftovers of interrupted writes.
    let normalized = content.trim_start_matches('\0');

    serde_json::from_str(normalized).map_err(|e| InputError::InvalidFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_validation() {
        assert!(validate_player_id("alice").is_ok());
        assert!(validate_player_id("guest-4f1c2a").is_ok());
        assert!(validate_player_id("tg.12345_x").is_ok());

        assert_eq!(validate_player_id(""), Err(IdentityError::Empty));
        assert_eq!(validate_player_id(" alice"), Err(IdentityError::InvalidWhitespace));
        assert_eq!(validate_player_id("../etc"), Err(IdentityError::PathTraversal));
        assert_eq!(validate_player_id("GUEST"), Err(IdentityError::Reserved));
        assert!(matches!(
            validate_player_id("al ice"),
            Err(IdentityError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_player_id(&"x".repeat(65)),
            Err(IdentityError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_display_name_validation() {
        assert_eq!(validate_display_name("José María").unwrap(), "José María");
        assert!(validate_display_name("🚀 Pilot").is_ok());
        assert_eq!(validate_display_name("   "), Err(IdentityError::Empty));
        assert!(validate_display_name("bad\u{0007}name").is_err());
    }

    #[test]
    fn test_secure_json_parse() {
        let parsed: Vec<u32> = secure_json_parse("\0[1,2,3]", 64).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
        assert!(matches!(
            secure_json_parse::<Vec<u32>>("[1,2,3]", 3),
            Err(InputError::TooLarge { limit: 3 })
        ));
        assert!(matches!(
            secure_json_parse::<Vec<u32>>("[1,", 64),
            Err(InputError::InvalidFormat(_))
        ));
    }
}
