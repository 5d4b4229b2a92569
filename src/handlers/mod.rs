pub mod auth;
pub mod likes;
pub mod posts;

use crate::error::AppError;

/// Fails with `message` when any of `fields` is empty or whitespace only.
/// Text fields are stored trimmed, so a blank one would be stored empty.
pub(crate) fn require_fields(fields: &[&str], message: &str) -> Result<(), AppError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Passwords are hashed exactly as sent; only an empty one is missing.
pub(crate) fn require_password(password: &str, message: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
