// handlers/protected/auth.rs - GET /profile

use crate::database::models::UserProfile;
use crate::database::UnitOfWork;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::acting_user;

pub async fn profile(auth: AuthUser, mut uow: UnitOfWork) -> ApiResult<UserProfile> {
    let user = acting_user(&mut uow, auth).await?;
    Ok(ApiResponse::success("Profile retrieved", UserProfile::from(user)))
}
