/// Request authentication guard
///
/// Resolves an `Authorization: Bearer <token>` header to a stored user. This is
/// the only authorization gate in the service: once a request carries an
/// [`AuthContext`], every task query is additionally filtered by
/// `AuthContext::user_id`, so there are no roles or scopes beyond ownership.
///
/// A request is rejected when:
/// - the header is missing or not a bearer credential
/// - the token fails verification (signature, issuer, expiry)
/// - the token's subject no longer exists
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use sqlx::PgPool;
/// use todo_shared::auth::guard::{authenticate, extract_bearer_token, AuthContext};
///
/// # async fn example(pool: PgPool, headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let token = extract_bearer_token(&headers)?;
/// let user = authenticate(&pool, token, "jwt-secret").await?;
/// let ctx = AuthContext::from(&user);
/// println!("request from {}", ctx.username);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use sqlx::PgPool;
use tracing::debug;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// Authenticated caller, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
}

impl From<&User> for AuthContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Not authenticated")]
    MissingCredentials,

    /// Authorization header is not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token verification failed
    #[error("Could not validate credentials: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its subject has been removed
    #[error("User not found")]
    UnknownSubject,

    /// User lookup failed
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Pulls the token out of `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Malformed authorization header".to_string()))?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Verifies `token` and loads the user it names
pub async fn authenticate(pool: &PgPool, token: &str, secret: &str) -> Result<User, AuthError> {
    let claims = validate_token(token, secret)?;

    let user = User::find_by_username(pool, &claims.sub)
        .await?
        .ok_or(AuthError::UnknownSubject)?;

    debug!(user_id = user.id, "Request authenticated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_token_scheme_case_insensitive() {
        let headers = headers_with("bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_missing_header() {
        let headers = HeaderMap::new();
        let result = extract_bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_extract_wrong_scheme() {
        let headers = headers_with("Basic YWxpY2U6cHcx");
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));

        let headers = headers_with("Bearer");
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));

        let headers = headers_with("Bearer   ");
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_auth_context_from_user() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            hashed_password: "$argon2id$...".to_string(),
            created_at: chrono::Utc::now(),
        };

        let ctx = AuthContext::from(&user);
        assert_eq!(ctx.user_id, 7);
        assert_eq!(ctx.username, "alice");
    }

    #[test]
    fn test_invalid_token_message() {
        let err = AuthError::from(JwtError::Expired);
        assert_eq!(err.to_string(), "Could not validate credentials: Token has expired");
    }
}
