// handlers/protected/articles.rs - Article create, update and delete

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::database::models::ArticleSummary;
use crate::database::repository::articles;
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::middleware::{authorize, Action, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{FieldErrors, TITLE_MAX};

use super::acting_user;

#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedArticle {
    pub deleted_article_id: i64,
}

/// POST /articles - author is the token's user
pub async fn create(
    auth: AuthUser,
    mut uow: UnitOfWork,
    JsonBody(payload): JsonBody<ArticleRequest>,
) -> ApiResult<ArticleSummary> {
    let author = acting_user(&mut uow, auth).await?;

    let mut errors = FieldErrors::new();
    let title = errors.required("title", payload.title.as_deref());
    let content = errors.required_text("content", payload.content.as_deref());
    if let Some(title) = title {
        errors.max_len("title", title, TITLE_MAX);
    }
    let (title, content) = match (title, content) {
        (Some(title), Some(content)) if errors.is_empty() => (title, content),
        _ => return Err(errors.into_error("Title and content are required")),
    };

    let article = articles::insert(uow.conn(), title, content, author.id).await?;
    uow.commit().await?;

    tracing::info!("User {} created article {}", author.id, article.id);
    Ok(ApiResponse::created(
        "Article created",
        ArticleSummary {
            id: article.id,
            title: article.title,
            content: article.content,
            author: author.username,
        },
    ))
}

/// PUT /articles/:id - partial update of title and/or content
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    mut uow: UnitOfWork,
    JsonBody(payload): JsonBody<ArticleRequest>,
) -> ApiResult<ArticleSummary> {
    // Fields may be omitted, but a field that is sent must not be blank
    let mut errors = FieldErrors::new();
    let title = payload
        .title
        .as_deref()
        .and_then(|t| errors.required("title", Some(t)));
    let content = payload
        .content
        .as_deref()
        .and_then(|c| errors.required_text("content", Some(c)));
    if let Some(title) = title {
        errors.max_len("title", title, TITLE_MAX);
    }
    errors.finish("Title and content cannot be blank")?;

    let article = articles::find(uow.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    let actor = acting_user(&mut uow, auth).await?;
    authorize(
        Action::UpdateArticle,
        &actor,
        Some(article.author_id),
        state.config.security.strict_ownership,
    )?;

    articles::update(uow.conn(), id, title, content).await?;
    let updated = articles::find_summary(uow.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    uow.commit().await?;

    tracing::info!("User {} updated article {}", actor.id, id);
    Ok(ApiResponse::success("Article updated", updated))
}

/// DELETE /articles/:id - owner or admin only; comments and category links go with it
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    mut uow: UnitOfWork,
) -> ApiResult<DeletedArticle> {
    let actor = acting_user(&mut uow, auth).await?;
    let article = articles::find(uow.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    authorize(
        Action::DeleteArticle,
        &actor,
        Some(article.author_id),
        state.config.security.strict_ownership,
    )?;

    if let Err(e) = articles::delete(uow.conn(), id).await {
        tracing::error!("Deleting article {} failed, rolling back: {}", id, e);
        uow.rollback().await;
        return Err(ApiError::internal_server_error("An error occurred while deleting the article"));
    }
    if let Err(e) = uow.commit().await {
        tracing::error!("Committing deletion of article {} failed: {}", id, e);
        return Err(ApiError::internal_server_error("An error occurred while deleting the article"));
    }

    tracing::info!("User {} deleted article {}", actor.id, id);
    Ok(ApiResponse::success(
        "Article deleted",
        DeletedArticle {
            deleted_article_id: id,
        },
    ))
}
