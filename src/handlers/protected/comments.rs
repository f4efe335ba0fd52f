// handlers/protected/comments.rs - Comment creation and deletion

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::database::models::Comment;
use crate::database::repository::{articles, comments};
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::middleware::{authorize, Action, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::FieldErrors;

use super::acting_user;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedComment {
    pub deleted_comment_id: i64,
}

/// POST /articles/:id/comments
///
/// Checked in order: the commenting user, the article, then the content.
pub async fn create(
    auth: AuthUser,
    PathId(article_id): PathId,
    mut uow: UnitOfWork,
    JsonBody(payload): JsonBody<CommentRequest>,
) -> ApiResult<Comment> {
    let author = acting_user(&mut uow, auth).await?;
    if articles::find(uow.conn(), article_id).await?.is_none() {
        return Err(ApiError::not_found("Article not found"));
    }

    let mut errors = FieldErrors::new();
    let Some(content) = errors.required_text("content", payload.content.as_deref()) else {
        return Err(errors.into_error("Comment content is missing"));
    };

    let comment = comments::insert(uow.conn(), content, author.id, article_id).await?;
    uow.commit().await?;

    tracing::info!("User {} commented on article {} (comment {})", author.id, article_id, comment.id);
    Ok(ApiResponse::created("Comment added", comment))
}

/// DELETE /comments/:id
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    mut uow: UnitOfWork,
) -> ApiResult<DeletedComment> {
    let actor = acting_user(&mut uow, auth).await?;
    let comment = comments::find(uow.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;
    authorize(
        Action::DeleteComment,
        &actor,
        Some(comment.author_id),
        state.config.security.strict_ownership,
    )?;

    comments::delete(uow.conn(), id).await?;
    uow.commit().await?;

    tracing::info!("User {} deleted comment {}", actor.id, id);
    Ok(ApiResponse::success(
        "Comment deleted",
        DeletedComment {
            deleted_comment_id: id,
        },
    ))
}
