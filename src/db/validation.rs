//! Field rules checked before a record is written

use thiserror::Error;

pub const MIN_AUTHOR_NAME_LEN: usize = 4;
pub const MIN_BOOK_TITLE_LEN: usize = 2;
pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{field}` is required")]
    Required { field: &'static str },

    #[error("`{field}` must be at least {min} characters long")]
    TooShort { field: &'static str, min: usize },

    #[error("`{field}` must be unique, `{value}` already exists")]
    Duplicate { field: &'static str, value: String },
}

/// Require a non-blank value of at least `min` characters (after trimming)
pub fn require_min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::Required { field });
    }
    if len < min {
        return Err(ValidationError::TooShort { field, min });
    }
    Ok(())
}
