use sqlx::SqliteConnection;

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, CommentView};

pub async fn insert(
    conn: &mut SqliteConnection,
    content: &str,
    author_id: i64,
    article_id: i64,
) -> Result<Comment, DatabaseError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (content, author_id, article_id)
        VALUES (?, ?, ?)
        RETURNING id, content, author_id, article_id
        "#,
    )
    .bind(content)
    .bind(author_id)
    .bind(article_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(comment)
}

pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Comment>, DatabaseError> {
    let comment = sqlx::query_as::<_, Comment>(
        "SELECT id, content, author_id, article_id FROM comments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(comment)
}

pub async fn for_article(
    conn: &mut SqliteConnection,
    article_id: i64,
) -> Result<Vec<CommentView>, DatabaseError> {
    let comments = sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.content, u.username AS user
        FROM comments c
        INNER JOIN users u ON u.id = c.author_id
        WHERE c.article_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(article_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(comments)
}

pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::articles;
    use crate::database::repository::test_support::seed_user;
    use crate::database::DatabaseManager;

    #[tokio::test]
    async fn lists_comments_with_commenter_name() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let alice = seed_user(&mut conn, "alice").await;
        let bob = seed_user(&mut conn, "bob").await;
        let article = articles::insert(&mut conn, "T", "C", alice.id).await.unwrap();

        insert(&mut conn, "first", bob.id, article.id).await.unwrap();
        insert(&mut conn, "second", alice.id, article.id).await.unwrap();

        let views = for_article(&mut conn, article.id).await.unwrap();
        let pairs: Vec<(&str, &str)> = views.iter().map(|v| (v.content.as_str(), v.user.as_str())).collect();
        assert_eq!(pairs, [("first", "bob"), ("second", "alice")]);
    }

    #[tokio::test]
    async fn rejects_comment_on_missing_article() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let alice = seed_user(&mut conn, "alice").await;

        let err = insert(&mut conn, "hi", alice.id, 404).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ForeignKeyViolation(_)));
    }
}
