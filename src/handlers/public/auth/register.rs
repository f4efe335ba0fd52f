// handlers/public/auth/register.rs - POST /register handler

use axum::extract::State;
use serde::Deserialize;

use super::utils::hash_password_blocking;
use crate::database::models::{NewUser, UserProfile};
use crate::database::repository::users;
use crate::database::{TxMode, UnitOfWork};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{validate_email_format, validate_username_format, FieldErrors};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/**
 * POST /register - Create a new account
 *
 * Expected Input:
 * ```json
 * { "username": "alice", "email": "a@x.com", "password": "pw1" }
 * ```
 *
 * Returns 201 with the new user's public fields. A username or email that is already
 * in use is a `CONFLICT` (400); nothing is written in that case.
 */
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<UserProfile> {
    let (username, email, password) = validate(&payload)?;

    // Hashing is slow, so it runs before the write lock is taken
    let password_hash =
        hash_password_blocking(password.to_string(), state.config.security.bcrypt_cost).await?;

    let mut uow = UnitOfWork::begin(&state.pool, TxMode::Write).await?;
    if users::username_or_email_taken(uow.conn(), username, email).await? {
        tracing::info!("Registration refused: username or email already in use ({})", username);
        return Err(ApiError::conflict("Username or email is already in use"));
    }

    let user = users::insert(
        uow.conn(),
        &NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;
    uow.commit().await?;

    tracing::info!("Registered user '{}' (id {})", user.username, user.id);
    Ok(ApiResponse::created("User registered successfully", UserProfile::from(user)))
}

fn validate(payload: &RegisterRequest) -> Result<(&str, &str, &str), ApiError> {
    let mut errors = FieldErrors::new();

    let username = errors.required("username", payload.username.as_deref());
    let email = errors.required("email", payload.email.as_deref());
    // Passwords are taken verbatim; only emptiness is rejected
    let password = payload.password.as_deref().filter(|p| !p.is_empty());
    if password.is_none() {
        errors.add("password", "password is required");
    }

    if let Some(username) = username {
        errors.check("username", validate_username_format(username));
    }
    if let Some(email) = email {
        errors.check("email", validate_email_format(email));
    }

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) if errors.is_empty() => {
            Ok((username, email, password))
        }
        _ => Err(errors.into_error("Missing or invalid registration details")),
    }
}
