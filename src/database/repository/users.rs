use sqlx::SqliteConnection;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserProfile};

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, is_admin FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

pub async fn find_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password_hash, is_admin FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

/// True when either the username or the email already belongs to someone
pub async fn username_or_email_taken(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
) -> Result<bool, DatabaseError> {
    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? OR email = ?)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(taken != 0)
}

pub async fn insert(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES (?, ?, ?)
        RETURNING id, username, email, password_hash, is_admin
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}

/// Grant or revoke the admin flag. Returns false when no such user exists.
pub async fn set_admin(
    conn: &mut SqliteConnection,
    username: &str,
    is_admin: bool,
) -> Result<bool, DatabaseError> {
    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE username = ?")
        .bind(is_admin)
        .bind(username)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<UserProfile>, DatabaseError> {
    let users = sqlx::query_as::<_, UserProfile>(
        "SELECT id, username, email, is_admin FROM users ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(users)
}
