use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(rename = "user_id")]
    pub author_id: i64,
    pub article_id: i64,
}

/// Comment joined with the commenter's username
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub user: String,
}
