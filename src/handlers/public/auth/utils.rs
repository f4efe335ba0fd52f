use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;

/// Hash on the blocking pool; bcrypt at production cost takes long enough to stall
/// a runtime worker.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error("Failed to process password")
        })??;

    Ok(hash)
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("Failed to process password")
        })
}
