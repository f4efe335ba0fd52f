// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// `jwt_auth_middleware` has already validated the bearer token and stored an
// `AuthUser` in the request extensions. Each handler still resolves that id to a
// user row inside its own unit of work, because the account may have been removed
// after the token was issued.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;

use crate::database::models::User;
use crate::database::repository::users;
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Load the user behind the token, or `NOT_FOUND` if the account is gone.
pub(crate) async fn acting_user(uow: &mut UnitOfWork, auth: AuthUser) -> Result<User, ApiError> {
    users::find_by_id(uow.conn(), auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token refers to missing user {}", auth.user_id);
            ApiError::not_found("User not found")
        })
}
