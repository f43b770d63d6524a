/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access token issuance and verification
/// - [`guard`]: Bearer-token resolution to an authenticated user
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use todo_shared::auth::{jwt, password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = password::hash_password("pw1")?;
/// assert!(password::verify_password("pw1", &hash)?);
///
/// let token = jwt::issue_access_token("alice", Duration::minutes(30), "a-secret-of-at-least-32-bytes-long")?;
/// assert!(!token.is_empty());
/// # Ok(())
/// # }
/// ```

pub mod guard;
pub mod jwt;
pub mod password;
