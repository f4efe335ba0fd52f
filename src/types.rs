//! Shared types used across the handlers

use serde::{Deserialize, Serialize};

use crate::database::models::ArticleSummary;

/// Raw `page` / `per_page` query parameters.
///
/// Kept as strings so that a malformed value falls back to the default instead of
/// rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Normalize raw parameters: `page` below 1 becomes 1, a missing, unparsable or
    /// non-positive `per_page` takes `default`, and anything above `max` is clamped.
    pub fn resolve(page: Option<&str>, per_page: Option<&str>, default: u32, max: u32) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);

        let per_page = per_page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(max as i64) as u32)
            .unwrap_or(default)
            .clamp(1, max.max(1));

        Self { page, per_page }
    }

    pub fn from_query(query: &PageQuery, default: u32, max: u32) -> Self {
        Self::resolve(query.page.as_deref(), query.per_page.as_deref(), default, max)
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Number of pages needed for `total` items
    pub fn pages(&self, total: i64) -> i64 {
        let per_page = self.per_page as i64;
        (total + per_page - 1) / per_page
    }
}

/// One page of article summaries plus the counts a client needs to paginate
#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<ArticleSummary>,
    pub total: i64,
    pub page: u32,
    pub pages: i64,
    pub per_page: u32,
}

impl ArticlePage {
    pub fn new(articles: Vec<ArticleSummary>, total: i64, request: PageRequest) -> Self {
        Self {
            articles,
            total,
            page: request.page,
            pages: request.pages(total),
            per_page: request.per_page,
        }
    }
}
