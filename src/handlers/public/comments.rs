// handlers/public/comments.rs - GET /articles/:id/comments

use serde::Serialize;

use crate::database::models::CommentView;
use crate::database::repository::{articles, comments};
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::PathId;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<CommentView>,
}

pub async fn list(PathId(article_id): PathId, mut uow: UnitOfWork) -> ApiResult<CommentList> {
    if articles::find(uow.conn(), article_id).await?.is_none() {
        return Err(ApiError::not_found("Article not found"));
    }
    let comments = comments::for_article(uow.conn(), article_id).await?;

    Ok(ApiResponse::success("Comments retrieved", CommentList { comments }))
}
