/// Authentication endpoints
///
/// - `POST /register` - JSON `{username, password}`, creates an account
/// - `POST /login` - form-encoded `{username, password}`, returns a bearer token
///
/// Login takes `application/x-www-form-urlencoded` so standard OAuth2
/// password-flow clients can use it unchanged.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::reject_nul,
};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use serde::{Deserialize, Serialize};
use todo_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use tracing::info;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = "reject_nul")
    )]
    pub username: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Login form (OAuth2 password grant field names)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// ```text
/// POST /register
/// Content-Type: application/json
///
/// {"username": "alice", "password": "pw1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username already exists
/// - `400 Bad Request`: Body is not JSON
/// - `422 Unprocessable Entity`: Empty username or password, NUL in username
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = body?;
    req.validate()?;

    let RegisterRequest { username, password } = req;
    let hashed_password =
        tokio::task::spawn_blocking(move || password::hash_password(&password)).await??;

    let user = User::create(
        &state.db,
        CreateUser {
            username,
            hashed_password,
        },
    )
    .await?
    .ok_or_else(ApiError::duplicate_username)?;

    info!(user_id = user.id, "User registered");
    Ok(Json(MessageResponse::new("User created")))
}

/// Exchange username and password for an access token
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=alice&password=pw1
/// ```
///
/// ```json
/// {"access_token": "eyJ...", "token_type": "bearer"}
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown user or wrong password (indistinguishable)
/// - `422 Unprocessable Entity`: Missing form field
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Form(LoginForm { username, password }) = form?;

    // NUL can never be stored, so such a name is simply unknown
    let user = if username.contains('\0') {
        None
    } else {
        User::find_by_username(&state.db, &username).await?
    };

    let stored_hash = user.as_ref().map(|u| u.hashed_password.clone());
    let valid = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => password::simulate_verification(&password),
    })
    .await??;

    let user = match user {
        Some(user) if valid => user,
        Some(user) => {
            info!(user_id = user.id, "Login rejected");
            return Err(ApiError::invalid_credentials());
        }
        None => return Err(ApiError::invalid_credentials()),
    };

    let access_token = jwt::issue_access_token(
        &user.username,
        state.config.access_token_lifetime(),
        state.jwt_secret(),
    )?;

    info!(user_id = user.id, "Access token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
