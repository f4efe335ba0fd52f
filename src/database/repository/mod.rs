//! Query functions grouped by entity.
//!
//! Every function takes a `&mut SqliteConnection` so that callers decide the
//! transactional scope; handlers pass [`super::UnitOfWork::conn`]. Joins are spelled
//! out per query rather than resolved lazily, so each listing is a single round trip.

pub mod articles;
pub mod categories;
pub mod comments;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqliteConnection;

    use crate::database::models::{NewUser, User};

    pub async fn seed_user(conn: &mut SqliteConnection, username: &str) -> User {
        super::users::insert(
            conn,
            &NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "$2b$04$not-a-real-hash".to_string(),
            },
        )
        .await
        .unwrap()
    }
}
