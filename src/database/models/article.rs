use serde::Serialize;
use sqlx::FromRow;

use super::category::Category;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Article joined with its author's username
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: ArticleSummary,
    pub categories: Vec<Category>,
}

/// Listing entry for a user's own articles (no author field)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthoredArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
}
