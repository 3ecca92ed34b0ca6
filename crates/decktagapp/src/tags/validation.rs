//! Tag string validation.
//!
//! Tags are free-form labels typed by the user, so the rules are loose:
//! - Surrounding whitespace is trimmed before storing
//! - The trimmed tag must not be empty
//! - Control characters (newlines, tabs, ...) are rejected

/// Validates a tag and returns its trimmed form.
///
/// # Examples
/// ```
/// use decktagapp::tags::validation::normalize_tag;
///
/// assert_eq!(normalize_tag("  combo-piece ").unwrap(), "combo-piece");
/// assert_eq!(normalize_tag("mana rock").unwrap(), "mana rock");
///
/// assert!(normalize_tag("").is_err());
/// assert!(normalize_tag("   ").is_err());
/// assert!(normalize_tag("two\nlines").is_err());
/// ```
pub fn normalize_tag(tag: &str) -> Result<String, TagValidationError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(TagValidationError::Empty);
    }

    if let Some(ch) = trimmed.chars().find(|c| c.is_control()) {
        return Err(TagValidationError::ControlCharacter(ch));
    }

    Ok(trimmed.to_string())
}

/// Error type for tag validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    /// Tag is empty after trimming
    Empty,
    /// Tag contains a control character
    ControlCharacter(char),
}

impl std::fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagValidationError::Empty => write!(f, "tag cannot be empty"),
            TagValidationError::ControlCharacter(ch) => {
                write!(f, "tag contains control character {:?}", ch)
            }
        }
    }
}

impl std::error::Error for TagValidationError {}
