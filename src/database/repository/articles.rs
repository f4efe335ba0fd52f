use sqlx::SqliteConnection;

use crate::database::manager::DatabaseError;
use crate::database::models::{Article, ArticleSummary, AuthoredArticle};

pub async fn insert(
    conn: &mut SqliteConnection,
    title: &str,
    content: &str,
    author_id: i64,
) -> Result<Article, DatabaseError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (title, content, author_id)
        VALUES (?, ?, ?)
        RETURNING id, title, content, author_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(article)
}

pub async fn find(conn: &mut SqliteConnection, id: i64) -> Result<Option<Article>, DatabaseError> {
    let article = sqlx::query_as::<_, Article>(
        "SELECT id, title, content, author_id FROM articles WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(article)
}

pub async fn find_summary(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<ArticleSummary>, DatabaseError> {
    let article = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT a.id, a.title, a.content, u.username AS author
        FROM articles a
        INNER JOIN users u ON u.id = a.author_id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(article)
}

pub async fn count(conn: &mut SqliteConnection) -> Result<i64, DatabaseError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
        .fetch_one(&mut *conn)
        .await?;

    Ok(total)
}

pub async fn list(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<ArticleSummary>, DatabaseError> {
    let articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT a.id, a.title, a.content, u.username AS author
        FROM articles a
        INNER JOIN users u ON u.id = a.author_id
        ORDER BY a.id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *conn)
    .await?;

    Ok(articles)
}

/// Number of articles whose title or content contains `query`
pub async fn count_matching(conn: &mut SqliteConnection, query: &str) -> Result<i64, DatabaseError> {
    let pattern = like_pattern(query);
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM articles
        WHERE title LIKE ?1 ESCAPE '\' OR content LIKE ?1 ESCAPE '\'
        "#,
    )
    .bind(&pattern)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

pub async fn search(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<ArticleSummary>, DatabaseError> {
    let pattern = like_pattern(query);
    let articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT a.id, a.title, a.content, u.username AS author
        FROM articles a
        INNER JOIN users u ON u.id = a.author_id
        WHERE a.title LIKE ?1 ESCAPE '\' OR a.content LIKE ?1 ESCAPE '\'
        ORDER BY a.id
        LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *conn)
    .await?;

    Ok(articles)
}

/// Partial update: `None` leaves the column untouched.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Article, DatabaseError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        UPDATE articles
        SET title = COALESCE(?, title), content = COALESCE(?, content)
        WHERE id = ?
        RETURNING id, title, content, author_id
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(article)
}

/// Removes the article with its comments and category links.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, DatabaseError> {
    sqlx::query("DELETE FROM comments WHERE article_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn by_author(
    conn: &mut SqliteConnection,
    author_id: i64,
) -> Result<Vec<AuthoredArticle>, DatabaseError> {
    let articles = sqlx::query_as::<_, AuthoredArticle>(
        "SELECT id, title, content FROM articles WHERE author_id = ? ORDER BY id",
    )
    .bind(author_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(articles)
}

pub async fn by_category(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<Vec<ArticleSummary>, DatabaseError> {
    let articles = sqlx::query_as::<_, ArticleSummary>(
        r#"
        SELECT a.id, a.title, a.content, u.username AS author
        FROM article_categories ac
        INNER JOIN articles a ON a.id = ac.article_id
        INNER JOIN users u ON u.id = a.author_id
        WHERE ac.category_id = ?
        ORDER BY a.id
        "#,
    )
    .bind(category_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(articles)
}

/// `%query%` with LIKE wildcards in the query taken literally
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
