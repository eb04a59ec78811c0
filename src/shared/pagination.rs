//! Page-number pagination.
//!
//! Every list endpoint returns `{count, next, previous, results}` with a
//! fixed page size. `next`/`previous` are links built from the request URI
//! with only the `page` parameter rewritten.

use axum::http::Uri;
use serde::Serialize;

use super::error::AppError;

/// Items per page on every list endpoint.
pub const PAGE_SIZE: i64 = 10;

/// A requested page (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None)
    }
}

/// One page of rows plus the total row count of the unpaged query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn has_next(&self) -> bool {
        self.request.offset() + (self.items.len() as i64) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.request.page > 1
    }

    /// Pages past the end are an error, except page 1 of an empty list.
    pub fn ensure_in_range(self) -> Result<Self, AppError> {
        if self.request.page > 1 && self.request.offset() >= self.total {
            return Err(AppError::NotFound("Invalid page.".into()));
        }
        Ok(self)
    }
}

/// Paginated response envelope.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn from_page(page: Page<T>, uri: &Uri) -> Result<Self, AppError> {
        let page = page.ensure_in_range()?;
        let current = page.request.page;

        let next = page.has_next().then(|| page_link(uri, current + 1));
        let previous = page.has_previous().then(|| page_link(uri, current - 1));

        Ok(Self {
            count: page.total,
            next,
            previous,
            results: page.items,
        })
    }
}

/// Rebuild `uri` with `page` replaced. Page 1 drops the parameter entirely.
pub fn page_link(uri: &Uri, page: u32) -> String {
    let page_param = format!("page={}", page);
    let mut params: Vec<&str> = uri
        .query()
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty())
                .filter(|pair| pair.split('=').next() != Some("page"))
                .collect()
        })
        .unwrap_or_default();

    if page > 1 {
        params.push(&page_param);
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}
