// handlers/public/categories.rs - Category listing, creation and per-article lookup

use serde::{Deserialize, Serialize};

use crate::database::models::Category;
use crate::database::repository::{articles, categories};
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::{JsonBody, PathId};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{FieldErrors, CATEGORY_NAME_MAX};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

/// GET /categories
pub async fn list(mut uow: UnitOfWork) -> ApiResult<CategoryList> {
    let categories = categories::list(uow.conn()).await?;
    Ok(ApiResponse::success("Categories retrieved", CategoryList { categories }))
}

/// POST /categories - name required and unique
pub async fn create(
    mut uow: UnitOfWork,
    JsonBody(payload): JsonBody<CreateCategoryRequest>,
) -> ApiResult<Category> {
    let mut errors = FieldErrors::new();
    let name = errors.required("name", payload.name.as_deref());
    if let Some(name) = name {
        errors.max_len("name", name, CATEGORY_NAME_MAX);
    }
    let name = match name {
        Some(name) if errors.is_empty() => name,
        _ => return Err(errors.into_error("Category name is required")),
    };

    if categories::name_taken(uow.conn(), name).await? {
        return Err(ApiError::conflict("A category with this name already exists"));
    }

    let category = categories::insert(uow.conn(), name).await?;
    uow.commit().await?;

    tracing::info!("Created category '{}' (id {})", category.name, category.id);
    Ok(ApiResponse::created("Category created", category))
}

/// GET /articles/:id/categories
pub async fn for_article(PathId(article_id): PathId, mut uow: UnitOfWork) -> ApiResult<CategoryList> {
    if articles::find(uow.conn(), article_id).await?.is_none() {
        return Err(ApiError::not_found("Article not found"));
    }
    let categories = categories::for_article(uow.conn(), article_id).await?;

    Ok(ApiResponse::success("Categories retrieved", CategoryList { categories }))
}
