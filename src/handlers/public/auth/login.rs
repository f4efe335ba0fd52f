// handlers/public/auth/login.rs - POST /login handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use super::utils::verify_password_blocking;
use crate::database::models::UserProfile;
use crate::database::repository::users;
use crate::database::{TxMode, UnitOfWork};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::FieldErrors;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserProfile,
}

/**
 * POST /login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "email": "a@x.com", "password": "pw1" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "message": "Login successful",
 *   "data": {
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "token_type": "Bearer",
 *     "expires_in": 86400,
 *     "user": { "id": 1, "username": "alice", "email": "a@x.com", "is_admin": false }
 *   }
 * }
 * ```
 *
 * Unknown email and wrong password get the same 401 so the response does not reveal
 * which accounts exist.
 */
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut errors = FieldErrors::new();
    let email = errors.required("email", payload.email.as_deref());
    let password = payload.password.filter(|p| !p.is_empty());
    if password.is_none() {
        errors.add("password", "password is required");
    }
    let (Some(email), Some(password)) = (email, password) else {
        return Err(errors.into_error("Missing login details"));
    };

    // Read-only lookup, released before the password check
    let mut uow = UnitOfWork::begin(&state.pool, TxMode::Read).await?;
    let user = match users::find_by_email(uow.conn(), email).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Login failed: unknown email");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };
    uow.commit().await?;

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        tracing::warn!("Login failed: wrong password for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = state.tokens.issue(user.id)?;
    tracing::info!("User '{}' (id {}) logged in", user.username, user.id);

    Ok(ApiResponse::success(
        "Login successful",
        LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: state.tokens.expires_in(),
            user: UserProfile::from(user),
        },
    ))
}
