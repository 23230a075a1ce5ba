//! Pagination engine.
//!
//! Two mutually exclusive modes drive a list request:
//!
//! - **Basic paging**: an explicit list of page numbers. Only the first
//!   [`PAGING_RESULTS_MAX`] results of a query are reachable this way, so
//!   pages beyond `PAGING_RESULTS_MAX / per_page` are dropped up front.
//! - **Cursor paging**: starts at cursor `*` and follows `meta.next_cursor`
//!   until the API returns none.
//!
//! [`Pages`] is pull-based: each call to [`Pages::next`] issues at most one
//! request, and nothing is fetched ahead of the caller.

use crate::client::OpenAlexClient;
use crate::error::Result;
use futures::stream::{self, Stream};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Results reachable through basic paging.
pub const PAGING_RESULTS_MAX: u32 = 10_000;

/// Upper bound for `per_page`.
pub const PER_PAGE_MAX: u32 = 200;

/// `per_page` used when none (or a non-positive one) is given.
pub const PER_PAGE_DEFAULT: u32 = 25;

/// Cursor value that starts cursor paging.
pub const CURSOR_START: &str = "*";

/// Normalize `per_page`: missing or non-positive gives the default, large values are clamped.
pub fn resolve_per_page(per_page: Option<i32>) -> u32 {
    match per_page {
        Some(n) if n > 0 => (n as u32).min(PER_PAGE_MAX),
        _ => PER_PAGE_DEFAULT,
    }
}

/// Highest page reachable with basic paging for this page size.
pub fn max_page(per_page: u32) -> u32 {
    PAGING_RESULTS_MAX / per_page.max(1)
}

/// Keep the pages in `1..=max_page(per_page)`, in caller order.
pub fn valid_pages(pages: &[i64], per_page: u32) -> Vec<u32> {
    let max = i64::from(max_page(per_page));
    pages
        .iter()
        .copied()
        .filter(|&page| page > 0 && page <= max)
        .map(|page| page as u32)
        .collect()
}

/// Pagination mode for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paging {
    /// Fetch exactly these pages, in this order.
    Basic(Vec<u32>),
    /// Follow server cursors from [`CURSOR_START`].
    Cursor,
}

impl Paging {
    /// Basic paging when any pages were requested, cursor paging otherwise.
    ///
    /// Requested pages that are all out of range still select basic paging;
    /// the sequence is then empty.
    pub fn select(pages: &[i64], per_page: u32) -> Self {
        if pages.is_empty() {
            return Paging::Cursor;
        }

        let valid = valid_pages(pages, per_page);
        if valid.len() < pages.len() {
            warn!(
                requested = ?pages,
                max_page = max_page(per_page),
                "dropping pages outside the basic paging window"
            );
        }
        Paging::Basic(valid)
    }
}

#[derive(Debug)]
enum State {
    Basic(VecDeque<u32>),
    Cursor(String),
    Done,
}

/// Lazy, ordered sequence of JSON result pages for one list request.
///
/// Not restartable. After a transport error the sequence ends. Dropping it
/// (or simply not calling `next` again) issues no further requests.
///
/// ```no_run
/// # async fn example() -> openalex_client::error::Result<()> {
/// use openalex_client::{ListQuery, OpenAlexClient};
///
/// let client = OpenAlexClient::new();
/// let mut pages = client.works().list(&ListQuery::new().filter("is_oa", "true"))?;
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     println!("{} results", page["results"].as_array().map_or(0, |r| r.len()));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Pages {
    client: OpenAlexClient,
    path: String,
    params: Vec<(String, String)>,
    per_page: u32,
    state: State,
}

impl Pages {
    /// `params` are the validated query parameters, without paging ones.
    pub fn new(
        client: OpenAlexClient,
        path: impl Into<String>,
        params: Vec<(String, String)>,
        per_page: Option<i32>,
        pages: &[i64],
    ) -> Self {
        let per_page = resolve_per_page(per_page);
        let state = match Paging::select(pages, per_page) {
            Paging::Basic(pages) => State::Basic(pages.into()),
            Paging::Cursor => State::Cursor(CURSOR_START.to_string()),
        };

        Self {
            client,
            path: path.into(),
            params,
            per_page,
            state,
        }
    }

    /// The `per_page` value sent with every request.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Whether the sequence has ended.
    pub fn is_done(&self) -> bool {
        match &self.state {
            State::Basic(pages) => pages.is_empty(),
            State::Cursor(_) => false,
            State::Done => true,
        }
    }

    /// Fetch the next page, or `None` once the sequence has ended.
    pub async fn next(&mut self) -> Option<Result<Value>> {
        // Taken out so a failed or dropped request leaves the sequence finished.
        match std::mem::replace(&mut self.state, State::Done) {
            State::Done => None,
            State::Basic(mut remaining) => {
                let page = remaining.pop_front()?;
                let result = self.fetch("page", &page.to_string()).await;
                if result.is_ok() && !remaining.is_empty() {
                    self.state = State::Basic(remaining);
                }
                Some(result)
            }
            State::Cursor(cursor) => {
                let result = self.fetch("cursor", &cursor).await;
                if let Ok(page) = &result {
                    match next_cursor(page) {
                        Some(next) => self.state = State::Cursor(next),
                        None => debug!(path = %self.path, "cursor paging finished"),
                    }
                }
                Some(result)
            }
        }
    }

    /// Drain the sequence into a vector, stopping at the first error.
    ///
    /// Cursor paging is unbounded; only use this on queries known to be small.
    pub async fn try_collect(mut self) -> Result<Vec<Value>> {
        let mut collected = Vec::new();
        while let Some(page) = self.next().await {
            collected.push(page?);
        }
        Ok(collected)
    }

    /// Adapt into a [`Stream`] with the same pull-based behaviour.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        stream::unfold(self, |mut pages| async move {
            let item = pages.next().await?;
            Some((item, pages))
        })
    }

    async fn fetch(&self, position_key: &str, position: &str) -> Result<Value> {
        let per_page = self.per_page.to_string();
        let mut params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        params.push(("per_page", &per_page));
        params.push((position_key, position));

        debug!(path = %self.path, %position_key, %position, "fetching page");
        self.client.get(&self.path, &params).await
    }
}

/// `meta.next_cursor`, if present and non-empty.
fn next_cursor(page: &Value) -> Option<String> {
    page.get("meta")
        .and_then(|meta| meta.get("next_cursor"))
        .and_then(Value::as_str)
        .filter(|cursor| !cursor.is_empty())
        .map(String::from)
}
