//! Lazy page-at-a-time access to paginated GitLab collections.
//!
//! A [`Pager`] performs no I/O until a page is requested. Page boundaries are taken
//! from the response headers GitLab sends with every collection page:
//!
//! - `X-Total-Pages` / `X-Total`: totals (omitted by GitLab for very large sets)
//! - `X-Next-Page`: following page number, empty on the last page
//! - `X-Page` / `X-Per-Page`: echo of the request
//!
//! Three consumption modes are offered: [`Pager::all`] materialises everything,
//! [`Pager::next`] / [`Pager::page`] pull pages explicitly, and [`Pager::stream`]
//! yields items lazily, fetching the next page only once the previous one is drained.

use crate::api::transport::{decode_json, validate_per_page, Transport};
use crate::error::ApiError;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";
pub const TOTAL_HEADER: &str = "x-total";
pub const PER_PAGE_HEADER: &str = "x-per-page";
pub const PAGE_HEADER: &str = "x-page";
pub const NEXT_PAGE_HEADER: &str = "x-next-page";

pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "per_page";

/// Lazy item stream produced by [`Pager::stream`]
pub type PagerStream<T> = BoxStream<'static, Result<T, ApiError>>;

/// Pagination metadata of one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
    pub next_page: Option<u32>,
}

impl PageInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            page: header_number(headers, PAGE_HEADER),
            per_page: header_number(headers, PER_PAGE_HEADER),
            total_pages: header_number(headers, TOTAL_PAGES_HEADER),
            total_items: header_number(headers, TOTAL_HEADER),
            next_page: header_number(headers, NEXT_PAGE_HEADER),
        }
    }

    /// True when the response carried no pagination headers at all.
    pub fn is_unpaginated(&self) -> bool {
        self.page.is_none()
            && self.per_page.is_none()
            && self.total_pages.is_none()
            && self.total_items.is_none()
            && self.next_page.is_none()
    }
}

// Missing, empty and malformed values all read as "unknown".
fn header_number<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Cursor over a paginated collection resource.
///
/// Not restartable once consumed by [`Pager::all`] or [`Pager::stream`]; build a new
/// pager to iterate again.
pub struct Pager<T> {
    transport: Transport,
    path: Vec<String>,
    query: Vec<(String, String)>,
    items_per_page: u32,
    current_page: u32,
    info: Option<PageInfo>,
    exhausted: bool,
    current: Vec<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Pager<T> {
    pub fn new(
        transport: Transport,
        path: Vec<String>,
        query: Vec<(String, String)>,
        items_per_page: u32,
    ) -> Result<Self, ApiError> {
        let items_per_page = validate_per_page(items_per_page)?;
        // Paging parameters are owned by the pager.
        let query = query
            .into_iter()
            .filter(|(k, _)| k != PAGE_PARAM && k != PER_PAGE_PARAM)
            .collect();
        Ok(Self {
            transport,
            path,
            query,
            items_per_page,
            current_page: 0,
            info: None,
            exhausted: false,
            current: Vec::new(),
            _marker: PhantomData,
        })
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Index of the page held in [`Pager::current`]; 0 before the first fetch.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Server-reported page count, known after the first fetch.
    pub fn total_pages(&self) -> Option<u32> {
        self.info.and_then(|i| i.total_pages)
    }

    /// Server-reported item count, known after the first fetch.
    pub fn total_items(&self) -> Option<u64> {
        self.info.and_then(|i| i.total_items)
    }

    pub fn current(&self) -> &[T] {
        &self.current
    }

    pub fn has_next(&self) -> bool {
        if self.exhausted {
            return false;
        }
        let Some(info) = self.info else {
            return true;
        };
        if info.is_unpaginated() {
            return false;
        }
        match info.total_pages {
            Some(total) => self.current_page < total,
            None => info.next_page.is_some(),
        }
    }

    /// Fetch the page following the current one; `None` once the collection is
    /// exhausted.
    pub async fn next(&mut self) -> Result<Option<&[T]>, ApiError> {
        if !self.has_next() {
            return Ok(None);
        }
        let next = match self.info.and_then(|i| i.next_page) {
            Some(hinted) if hinted > self.current_page => hinted,
            _ => self.current_page + 1,
        };
        self.fetch(next).await?;
        if self.current.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        Ok(Some(&self.current))
    }

    /// Fetch an arbitrary page (1-based) and move the cursor to it.
    pub async fn page(&mut self, page: u32) -> Result<&[T], ApiError> {
        if page == 0 {
            return Err(ApiError::InvalidArgument(
                "Page numbers start at 1".to_string(),
            ));
        }
        self.exhausted = false;
        self.fetch(page).await?;
        Ok(&self.current)
    }

    pub async fn first(&mut self) -> Result<&[T], ApiError> {
        self.page(1).await
    }

    /// Fetch every remaining page and return all items in order.
    pub async fn all(mut self) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        while self.has_next() {
            if self.next().await?.is_none() {
                break;
            }
            items.append(&mut self.current);
        }
        Ok(items)
    }

    async fn fetch(&mut self, page: u32) -> Result<(), ApiError> {
        let mut query = self.query.clone();
        query.push((PAGE_PARAM.to_string(), page.to_string()));
        query.push((PER_PAGE_PARAM.to_string(), self.items_per_page.to_string()));

        let segments: Vec<&str> = self.path.iter().map(String::as_str).collect();
        debug!(path = %self.path.join("/"), page, per_page = self.items_per_page, "fetching page");

        let response = self.transport.get(&segments, &query).await?;
        let info = PageInfo::from_headers(response.headers());
        let items: Vec<T> = decode_json(response).await?;

        debug!(
            page,
            items = items.len(),
            total_pages = ?info.total_pages,
            total_items = ?info.total_items,
            "page fetched"
        );

        self.current_page = page;
        self.info = Some(info);
        self.current = items;
        Ok(())
    }
}

impl<T: DeserializeOwned + Send + 'static> Pager<T> {
    /// Lazily yield every remaining item.
    ///
    /// A fetch error is yielded once at the point of failure and ends the stream.
    pub fn stream(self) -> PagerStream<T> {
        stream::try_unfold(self, |mut pager| async move {
            if pager.next().await?.is_none() {
                return Ok(None);
            }
            let items = std::mem::take(&mut pager.current);
            let page = stream::iter(items.into_iter().map(Ok::<T, ApiError>));
            Ok::<_, ApiError>(Some((page, pager)))
        })
        .try_flatten()
        .boxed()
    }
}
