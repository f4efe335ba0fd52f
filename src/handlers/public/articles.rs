// handlers/public/articles.rs - Read-only article views

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::database::models::{ArticleDetail, ArticleSummary, AuthoredArticle};
use crate::database::repository::{articles, categories, users};
use crate::database::UnitOfWork;
use crate::error::ApiError;
use crate::extract::PathId;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{ArticlePage, PageQuery, PageRequest};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArticleList<T> {
    pub articles: Vec<T>,
}

/// GET /articles - paginated listing, oldest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    mut uow: UnitOfWork,
) -> ApiResult<ArticlePage> {
    let api = &state.config.api;
    let request = PageRequest::from_query(&query, api.default_per_page, api.max_per_page);

    let total = articles::count(uow.conn()).await?;
    let items = articles::list(uow.conn(), request.limit(), request.offset()).await?;

    Ok(ApiResponse::success(
        "Articles retrieved",
        ArticlePage::new(items, total, request),
    ))
}

/// GET /articles/search?q=&page=&per_page= - substring match on title or content
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    mut uow: UnitOfWork,
) -> ApiResult<ArticlePage> {
    let api = &state.config.api;
    let request = PageRequest::resolve(
        query.page.as_deref(),
        query.per_page.as_deref(),
        api.search_per_page,
        api.max_per_page,
    );
    let term = query.q.as_deref().unwrap_or("");

    let total = articles::count_matching(uow.conn(), term).await?;
    let items = articles::search(uow.conn(), term, request.limit(), request.offset()).await?;

    Ok(ApiResponse::success(
        "Search results",
        ArticlePage::new(items, total, request),
    ))
}

/// GET /articles/:id - article with author and categories
pub async fn get(PathId(id): PathId, mut uow: UnitOfWork) -> ApiResult<ArticleDetail> {
    let article = articles::find_summary(uow.conn(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;
    let categories = categories::for_article(uow.conn(), id).await?;

    Ok(ApiResponse::success(
        "Article retrieved",
        ArticleDetail {
            article,
            categories,
        },
    ))
}

/// GET /articles/category/:id - every article linked to a category
pub async fn by_category(
    PathId(category_id): PathId,
    mut uow: UnitOfWork,
) -> ApiResult<ArticleList<ArticleSummary>> {
    if categories::find(uow.conn(), category_id).await?.is_none() {
        return Err(ApiError::not_found("Category not found"));
    }
    let articles = articles::by_category(uow.conn(), category_id).await?;

    Ok(ApiResponse::success(
        "Articles retrieved",
        ArticleList { articles },
    ))
}

/// GET /user/:id/articles - titles and content written by one user
pub async fn by_user(
    PathId(user_id): PathId,
    mut uow: UnitOfWork,
) -> ApiResult<ArticleList<AuthoredArticle>> {
    if users::find_by_id(uow.conn(), user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }
    let articles = articles::by_author(uow.conn(), user_id).await?;

    Ok(ApiResponse::success(
        "Articles retrieved",
        ArticleList { articles },
    ))
}
