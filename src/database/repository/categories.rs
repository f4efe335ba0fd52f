use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::database::manager::DatabaseError;
use crate::database::models::Category;

/// Ids bound per `IN (...)` lookup
const ID_CHUNK: usize = 500;

pub async fn insert(conn: &mut SqliteConnection, name: &str) -> Result<Category, DatabaseError> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    Ok(category)
}

pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Category>, DatabaseError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(category)
}

pub async fn name_taken(conn: &mut SqliteConnection, name: &str) -> Result<bool, DatabaseError> {
    let taken = sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?)")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(taken != 0)
}

pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Category>, DatabaseError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(categories)
}

/// Removes the category and its article links; articles stay.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, DatabaseError> {
    sqlx::query("DELETE FROM article_categories WHERE category_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn for_article(
    conn: &mut SqliteConnection,
    article_id: i64,
) -> Result<Vec<Category>, DatabaseError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT c.id, c.name
        FROM article_categories ac
        INNER JOIN categories c ON c.id = ac.category_id
        WHERE ac.article_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(article_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(categories)
}

/// The subset of `ids` that has no category row, in input order
pub async fn missing_ids(conn: &mut SqliteConnection, ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
    let mut found = HashSet::with_capacity(ids.len());

    // Stays well under SQLite's bound-parameter limit however long the list is
    for chunk in ids.chunks(ID_CHUNK) {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM categories WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows: Vec<i64> = query.build_query_scalar::<i64>().fetch_all(&mut *conn).await?;
        found.extend(rows);
    }

    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}

/// Link a category to an article. Returns false when the pair was already linked.
pub async fn link(
    conn: &mut SqliteConnection,
    article_id: i64,
    category_id: i64,
) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO article_categories (article_id, category_id) VALUES (?, ?)",
    )
    .bind(article_id)
    .bind(category_id)
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
    async fn linking_twice_leaves_one_link() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let alice = seed_user(&mut conn, "alice").await;
        let article = articles::insert(&mut conn, "T", "C", alice.id).await.unwrap();
        let rust = insert(&mut conn, "rust").await.unwrap();

        assert!(link(&mut conn, article.id, rust.id).await.unwrap());
        assert!(!link(&mut conn, article.id, rust.id).await.unwrap());
        assert_eq!(for_article(&mut conn, article.id).await.unwrap(), vec![rust]);
    }

    #[tokio::test]
    async fn reports_missing_ids() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let a = insert(&mut conn, "a").await.unwrap();
        let b = insert(&mut conn, "b").await.unwrap();

        assert!(missing_ids(&mut conn, &[a.id, b.id]).await.unwrap().is_empty());
        assert_eq!(missing_ids(&mut conn, &[a.id, 77, b.id, 78]).await.unwrap(), vec![77, 78]);
        assert!(missing_ids(&mut conn, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_handles_lists_beyond_the_parameter_limit() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let a = insert(&mut conn, "a").await.unwrap();

        let mut ids: Vec<i64> = (1_000_000..1_040_000).collect();
        ids.push(a.id);
        let missing = missing_ids(&mut conn, &ids).await.unwrap();

        assert_eq!(missing.len(), 40_000);
        assert!(!missing.contains(&a.id));
        assert_eq!(missing.first(), Some(&1_000_000));
    }

    #[tokio::test]
    async fn delete_unlinks_but_keeps_articles() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let alice = seed_user(&mut conn, "alice").await;
        let article = articles::insert(&mut conn, "T", "C", alice.id).await.unwrap();
        let rust = insert(&mut conn, "rust").await.unwrap();
        link(&mut conn, article.id, rust.id).await.unwrap();

        assert!(delete(&mut conn, rust.id).await.unwrap());
        assert!(for_article(&mut conn, article.id).await.unwrap().is_empty());
        assert!(articles::find(&mut conn, article.id).await.unwrap().is_some());
        assert!(!name_taken(&mut conn, "rust").await.unwrap());
    }
}
