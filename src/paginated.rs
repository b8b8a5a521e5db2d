use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::context::RequestContext;

/// Navigation metadata attached to every listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    /// Items matching the listing across all pages
    pub total_items: u64,
    /// Requested page, as given
    pub current_page: u32,
    /// `ceil(total_items / items_per_page)`
    pub total_pages: u64,
    /// Requested page size
    pub items_per_page: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    /// Absolute urls, `None` when the target page does not apply
    pub first_page_url: Option<String>,
    pub previous_page_url: Option<String>,
    pub next_page_url: Option<String>,
    pub last_page_url: Option<String>,
}

/// A page of items and how to reach its siblings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Items of the current page
    pub data: Vec<T>,
    /// Navigation metadata
    pub pagination: PaginationMetadata,
}

impl<T> IntoResponse for Paginated<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Number of pages needed for `total_count` items, 0 for an empty listing
#[must_use]
pub fn total_pages(total_count: u64, limit: u32) -> u64 {
    total_count.div_ceil(u64::from(limit))
}

/// Wrap a fetched page with its pagination metadata.
///
/// `limit` and `page` must be at least 1. A `page` past the last one is not
/// clamped, the caller gets an empty `data` with consistent metadata.
#[must_use]
pub fn build_paginated_response<T>(
    data: Vec<T>,
    total_count: u64,
    limit: u32,
    page: u32,
    ctx: &RequestContext,
) -> Paginated<T> {
    debug_assert!(limit > 0 && page > 0, "limit and page are normalized upstream");

    let total_pages = total_pages(total_count, limit);
    let has_previous_page = page > 1;
    let has_next_page = u64::from(page) < total_pages;

    let link = |cond: bool, target: u64| cond.then(|| ctx.page_url(limit, target));

    Paginated {
        data,
        pagination: PaginationMetadata {
            total_items: total_count,
            current_page: page,
            total_pages,
            items_per_page: limit,
            has_previous_page,
            has_next_page,
            first_page_url: link(page > 1, 1),
            previous_page_url: link(has_previous_page, u64::from(page) - 1),
            next_page_url: link(has_next_page, u64::from(page) + 1),
            last_page_url: link(u64::from(page) < total_pages, total_pages),
        },
    }
}
