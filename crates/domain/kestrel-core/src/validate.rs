use thiserror::Error;

use crate::accent::Rgb;

/// Characters that are not allowed in file and directory names on at least
/// one supported platform.
pub const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid hex color")]
    InvalidHexColor(String),
    #[error("'{value}' contains forbidden character '{ch}'")]
    ForbiddenCharacter { value: String, ch: char },
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

pub fn validate_hex_color(value: &str) -> Result<Rgb, ValidationError> {
    Rgb::parse_hex(value).ok_or_else(|| ValidationError::InvalidHexColor(value.to_string()))
}

/// Rejects names containing characters forbidden in file names, as well as
/// control characters.
pub fn validate_file_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    check_forbidden(value, FORBIDDEN_FILENAME_CHARS)
}

/// Like [`validate_file_name`], but path separators and a drive prefix are allowed.
pub fn validate_directory(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field: "directory" });
    }
    let rest = match value.as_bytes() {
        [drive, b':', ..] if drive.is_ascii_alphabetic() => &value[2..],
        _ => value,
    };
    check_forbidden(rest, FORBIDDEN_FILENAME_CHARS)
}

fn check_forbidden(value: &str, forbidden: &[char]) -> Result<(), ValidationError> {
    match value
        .chars()
        .find(|c| forbidden.contains(c) || c.is_control())
    {
        Some(ch) => Err(ValidationError::ForbiddenCharacter {
            value: value.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}
