//! DTOs mirroring the backend schema.
//!
//! The backend is inconsistent about field casing, so every response field
//! that has been seen in camelCase accepts that spelling as an alias. Nothing
//! past this module has to care which one was sent.

pub mod backlog;
pub mod documentation;
pub mod notification;
pub mod sprint;
pub mod user;

use crate::error::Error;

/// Client-side checks run before a payload is sent
pub trait Validate {
    fn validate(&self) -> Result<(), Error>;
}

pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(Error::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}
