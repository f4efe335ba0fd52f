// handlers/protected/categories.rs - Category linking and deletion

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::database::models::Category;
use crate::database::repository::{articles, categories};
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::middleware::{authorize, Action, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::acting_user;

#[derive(Debug, Deserialize)]
pub struct AttachRequest {
    pub categories: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct AttachedCategories {
    pub article_id: i64,
    /// Links created by this request; ids that were already linked are not counted
    pub linked: usize,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct DeletedCategory {
    pub deleted_category_id: i64,
}

/// POST /articles/:id/categories - body `{ "categories": [1, 2] }`
///
/// Every id is checked before anything is linked, so one unknown id leaves the
/// article's categories untouched.
pub async fn attach(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(article_id): PathId,
    mut uow: UnitOfWork,
    JsonBody(payload): JsonBody<AttachRequest>,
) -> ApiResult<AttachedCategories> {
    let mut ids = match payload.categories {
        Some(ids) if !ids.is_empty() => ids,
        _ => {
            return Err(ApiError::validation_error(
                "categories must be a non-empty list of category ids",
                None,
            ))
        }
    };
    // Keep first occurrence order
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));

    let article = articles::find(uow.conn(), article_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    let actor = acting_user(&mut uow, auth).await?;
    authorize(
        Action::AttachCategories,
        &actor,
        Some(article.author_id),
        state.config.security.strict_ownership,
    )?;

    if let Some(missing) = categories::missing_ids(uow.conn(), &ids).await?.first() {
        return Err(ApiError::not_found(format!("Category {} not found", missing)));
    }

    let mut linked = 0;
    for category_id in &ids {
        if categories::link(uow.conn(), article_id, *category_id).await? {
            linked += 1;
        }
    }
    let categories = categories::for_article(uow.conn(), article_id).await?;
    uow.commit().await?;

    tracing::info!("User {} linked {} categories to article {}", actor.id, linked, article_id);
    Ok(ApiResponse::success(
        "Categories added to article",
        AttachedCategories {
            article_id,
            linked,
            categories,
        },
    ))
}

/// DELETE /categories/:id - links are removed, articles are kept
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    mut uow: UnitOfWork,
) -> ApiResult<DeletedCategory> {
    let actor = acting_user(&mut uow, auth).await?;
    if categories::find(uow.conn(), id).await?.is_none() {
        return Err(ApiError::not_found("Category not found"));
    }
    authorize(
        Action::DeleteCategory,
        &actor,
        None,
        state.config.security.strict_ownership,
    )?;

    categories::delete(uow.conn(), id).await?;
    uow.commit().await?;

    tracing::info!("User {} deleted category {}", actor.id, id);
    Ok(ApiResponse::success(
        "Category deleted",
        DeletedCategory {
            deleted_category_id: id,
        },
    ))
}
