/// Access token issuance and verification
///
/// Tokens are HS256-signed JWTs carrying the username as `sub` plus an
/// absolute expiry. Nothing is stored server-side: a token is valid exactly
/// when its signature checks out and `exp` lies in the future. There is no
/// revocation and no refresh.
///
/// ```text
/// issued ──► valid    (signature ok, now < exp)
///        ──► expired  (now >= exp, permanent)
///        ──► invalid  (bad signature, issuer or encoding)
/// ```
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use todo_shared::auth::jwt::{issue_access_token, validate_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-signing-secret-of-at-least-32-bytes!";
/// let token = issue_access_token("alice", Duration::minutes(30), secret)?;
///
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every token this service issues
pub const ISSUER: &str = "todo-api";

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, encoding or claim check failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// `exp` is in the past
    #[error("Token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims
///
/// - `sub`: username of the authenticated user
/// - `iss`: always [`ISSUER`]
/// - `iat` / `nbf`: issue time (Unix seconds)
/// - `exp`: absolute expiry (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims for `subject` that expire `lifetime` from now
    pub fn new(subject: impl Into<String>, lifetime: Duration) -> Self {
        Self::with_expiration(subject, lifetime)
    }

    /// Claims with an arbitrary expiry offset
    ///
    /// A negative offset yields an already-expired claim set, which tests use
    /// to exercise rejection. Offsets past the representable range saturate.
    pub fn with_expiration(subject: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let issued = now.timestamp();
        let expires = now.checked_add_signed(expires_in).unwrap_or(if expires_in < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        Self {
            sub: subject.into(),
            iss: ISSUER.to_string(),
            iat: issued,
            nbf: issued.min(expires.timestamp()),
            exp: expires.timestamp(),
        }
    }
}

/// Signs claims with HS256
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Issues an access token for `subject` valid for `lifetime`
pub fn issue_access_token(subject: &str, lifetime: Duration, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(subject, lifetime), secret)
}

/// Verifies a token and returns its claims
///
/// Checks signature, issuer, `exp` and `nbf` with no clock leeway, so a
/// token is rejected the second it expires. Purely computational; no storage
/// is consulted.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}
