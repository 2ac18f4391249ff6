//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use basket_core::auth::{hash_password, verify_password, MIN_PASSWORD_LEN};
use basket_core::models::UserProfile;

use super::read_json;
use crate::{token, AppError, AppState, Claims};

/// Request body for registration
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login; `username` may also be the email
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// Response for the /api/auth/verify endpoint
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserProfile,
}

/// Non-empty field value
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

fn issue_for(state: &AppState, user: UserProfile) -> Result<(String, UserProfile), AppError> {
    let token = token::issue_token(
        &user,
        &state.config.jwt_secret,
        state.config.token_ttl,
        Utc::now(),
    )?;
    Ok((token, user))
}

/// Insert failures; a concurrent registration can take the name after the check
pub(crate) fn create_user_error(err: basket_core::Error) -> AppError {
    match err {
        basket_core::Error::AlreadyExists(what) => {
            warn!(%what, "Registration rejected: lost race for username or email");
            AppError::bad_request("Username or email already exists")
        }
        other => other.into(),
    }
}

/// POST /api/auth/register - Create an account and sign in
pub async fn register(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let req: RegisterRequest = read_json(request, true).await?;

    let (Some(username), Some(email), Some(password)) = (
        present(&req.username),
        present(&req.email),
        present(&req.password),
    ) else {
        return Err(AppError::bad_request(
            "Username, email, and password are required",
        ));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request(&format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    if state.db.user_exists(username, email)? {
        warn!(username, "Registration rejected: username or email taken");
        return Err(AppError::bad_request("Username or email already exists"));
    }

    // CPU-bound
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = state
        .db
        .create_user(username, email, &hash)
        .map_err(create_user_error)?;
    info!(username = %user.username, id = user.id, "User registered");

    let (token, user) = issue_for(&state, UserProfile::from(&user))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login - Exchange credentials for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AuthResponse>, AppError> {
    let req: LoginRequest = read_json(request, true).await?;

    let (Some(login_name), Some(password)) = (present(&req.username), present(&req.password)) else {
        return Err(AppError::bad_request("Username and password are required"));
    };

    let Some(user) = state.db.find_user_by_login(login_name)? else {
        warn!(login = login_name, "Login failed: unknown user");
        return Err(AppError::unauthorized("Invalid username or password"));
    };

    let password = password.to_string();
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await??;

    if !valid {
        warn!(login = login_name, "Login failed: wrong password");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    info!(username = %user.username, id = user.id, "Login succeeded");

    let (token, user) = issue_for(&state, UserProfile::from(&user))?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// GET /api/auth/verify - Confirm the bearer token is still valid
pub async fn verify(Extension(claims): Extension<Claims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: claims.user(),
    })
}
