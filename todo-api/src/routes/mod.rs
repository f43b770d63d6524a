/// API route handlers
///
/// - `index`: Static homepage
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `todos`: Owner-scoped task CRUD (bearer token required)

pub mod auth;
pub mod health;
pub mod index;
pub mod todos;

use validator::ValidationError;

/// Text columns cannot hold NUL, so it is refused before reaching storage
pub(crate) fn reject_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("nul_character");
        error.message = Some("Must not contain NUL characters".into());
        return Err(error);
    }
    Ok(())
}
