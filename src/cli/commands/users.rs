use serde_json::json;
use sqlx::SqlitePool;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::database::repository::users;

pub async fn set_admin(
    pool: &SqlitePool,
    username: &str,
    is_admin: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;

    if !users::set_admin(&mut conn, username, is_admin).await? {
        anyhow::bail!("No user named '{}'", username);
    }

    let message = if is_admin {
        format!("User '{}' is now an admin", username)
    } else {
        format!("User '{}' is no longer an admin", username)
    };
    output_success(
        output_format,
        &message,
        Some(json!({ "username": username, "is_admin": is_admin })),
    )
}

pub async fn list(pool: &SqlitePool, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    let users = users::list(&mut conn).await?;

    if users.is_empty() {
        return output_empty_collection(output_format, "users", "No users registered");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text => {
            println!("{:<6} {:<25} {:<35} {}", "ID", "USERNAME", "EMAIL", "ADMIN");
            println!("{}", "-".repeat(75));

            for user in &users {
                let admin = if user.is_admin { "yes" } else { "" };
                println!("{:<6} {:<25} {:<35} {}", user.id, user.username, user.email, admin);
            }
        }
    }

    Ok(())
}
