//! Domain Value Objects
//!
//! Validated query fields. Both end up inside a file name under the
//! storage root, so anything that could add a path component is rejected
//! here, before rate limiting or lookup.

use crate::domain::services::normalize_name;
use std::fmt;
use thiserror::Error;

/// Maximum length for a candidate name (in characters)
pub const CANDIDATE_NAME_MAX_LENGTH: usize = 64;

/// Maximum length for a candidate identification number (in characters)
pub const CANDIDATE_ID_MAX_LENGTH: usize = 32;

/// Error returned when a query field fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Body missing, not JSON, or lacking a required field
    #[error("request body must be JSON with string fields `name` and `id`")]
    Malformed,

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} is too long ({length} chars, maximum {max})")]
    TooLong {
        field: &'static str,
        length: usize,
        max: usize,
    },

    /// Path separators and control characters are never part of a name or id
    #[error("{field} contains an invalid character {char:?}")]
    InvalidCharacter { field: &'static str, char: char },
}

fn validate_field(field: &'static str, value: &str, max: usize) -> Result<(), InputError> {
    if value.is_empty() {
        return Err(InputError::Empty { field });
    }

    let length = value.chars().count();
    if length > max {
        return Err(InputError::TooLong { field, length, max });
    }

    if let Some(char) = value
        .chars()
        .find(|&c| matches!(c, '/' | '\\') || c.is_control())
    {
        return Err(InputError::InvalidCharacter { field, char });
    }

    Ok(())
}

/// Candidate name as entered, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName(String);

impl CandidateName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, InputError> {
        let trimmed = input.as_ref().trim();
        validate_field("name", trimmed, CANDIDATE_NAME_MAX_LENGTH)?;
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part used for storage-key matching
    #[inline]
    pub fn normalized(&self) -> &str {
        normalize_name(&self.0)
    }
}

impl fmt::Display for CandidateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate identification number, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(input: impl AsRef<str>) -> Result<Self, InputError> {
        let trimmed = input.as_ref().trim();
        validate_field("id", trimmed, CANDIDATE_ID_MAX_LENGTH)?;
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = CandidateName::new("  张三 ").unwrap();
        assert_eq!(name.as_str(), "张三");
        assert_eq!(name.normalized(), "张三");
    }

    #[test]
    fn test_name_normalized_uses_separator() {
        let name = CandidateName::new("阿依古丽·买买提").unwrap();
        assert_eq!(name.as_str(), "阿依古丽·买买提");
        assert_eq!(name.normalized(), "阿依古丽");
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(
            CandidateName::new("   "),
            Err(InputError::Empty { field: "name" })
        );
        assert_eq!(CandidateId::new(""), Err(InputError::Empty { field: "id" }));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "1".repeat(CANDIDATE_ID_MAX_LENGTH + 1);
        assert!(matches!(
            CandidateId::new(long),
            Err(InputError::TooLong { field: "id", .. })
        ));

        // Length counts characters, not bytes
        let name = "张".repeat(CANDIDATE_NAME_MAX_LENGTH);
        assert!(CandidateName::new(name).is_ok());
    }

    #[test]
    fn test_path_characters_rejected() {
        assert_eq!(
            CandidateId::new("../../etc/passwd"),
            Err(InputError::InvalidCharacter {
                field: "id",
                char: '/'
            })
        );
        assert!(CandidateName::new("张\\三").is_err());
        assert!(CandidateName::new("张\0三").is_err());
        assert!(CandidateId::new("2023\n0001").is_err());
    }

    #[test]
    fn test_dots_alone_are_allowed() {
        // The storage key always carries a '-', so these never form `..`
        assert!(CandidateId::new("..").is_ok());
        assert!(CandidateName::new("..").is_ok());
    }
}
