//! 36Kr news-flow pager.
//!
//! Walks the gateway's cursor chain one page at a time, pausing a fixed
//! [`PAGE_DELAY`] before every request after the first. Items are counted
//! against the target window as they arrive so progress can be reported,
//! but every fetched item is kept for the filter and diagnostics stages.
//!
//! # Stop conditions
//!
//! 1. A page request fails (transport or malformed body): stop, keep what was gathered
//! 2. The response carries no cursor: the feed is exhausted
//! 3. `max_pages` pages have been fetched: stop with a page-limit notice

use crate::api::{FeedSource, PageRequest};
use crate::error::FetchError;
use crate::filter::TargetWindow;
use crate::models::{PageCursor, RawItem};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Pause between consecutive page requests.
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Paging parameters.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub page_size: u32,
    /// The first page is always requested, even when this is zero.
    pub max_pages: u32,
    pub page_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 5,
            page_delay: PAGE_DELAY,
        }
    }
}

/// Why the paging loop ended.
#[derive(Debug)]
pub enum StopReason {
    /// The last page carried no cursor.
    CursorExhausted,
    /// `max_pages` was reached while a cursor was still available.
    PageLimit,
    /// A request failed; items from earlier pages are still reported.
    Failed(FetchError),
}

/// Everything the paging loop gathered.
#[derive(Debug)]
pub struct FetchReport {
    /// All fetched items, in page order.
    pub items: Vec<RawItem>,
    /// Pages successfully fetched.
    pub pages: u32,
    /// Items inside the target window, counted as pages arrived.
    pub in_window: usize,
    pub stop: StopReason,
}

/// Fetch pages from `source` until the cursor runs out, the page cap is hit,
/// or a request fails.
///
/// Never returns an error: a failing page ends the loop and is recorded as
/// [`StopReason::Failed`].
#[instrument(
    level = "info",
    skip_all,
    fields(date = %window.date, page_size = options.page_size, max_pages = options.max_pages)
)]
pub async fn fetch_news<S: FeedSource>(
    source: &S,
    options: &FetchOptions,
    window: &TargetWindow,
) -> FetchReport {
    let mut items = Vec::new();
    let mut pages = 0u32;
    let mut in_window = 0usize;
    let mut cursor: Option<PageCursor> = None;

    let stop = loop {
        if pages > 0 && !options.page_delay.is_zero() {
            sleep(options.page_delay).await;
        }

        let request = PageRequest {
            page_size: options.page_size,
            cursor: cursor.take(),
        };

        let page = match source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                error!(
                    page = pages + 1,
                    transport = e.is_transport(),
                    error = %e,
                    "Page request failed; keeping items gathered so far"
                );
                break StopReason::Failed(e);
            }
        };

        pages += 1;
        let page_in_window = page
            .items
            .iter()
            .filter(|item| window.contains(item.publish_time()))
            .count();
        in_window += page_in_window;
        info!(
            page = pages,
            items = page.items.len(),
            in_window = page_in_window,
            total_in_window = in_window,
            "Fetched page"
        );
        items.extend(page.items);

        match page.next_cursor {
            None => {
                info!(pages, "Feed exhausted");
                break StopReason::CursorExhausted;
            }
            Some(_) if pages >= options.max_pages => {
                warn!(max_pages = options.max_pages, "Reached page limit; stopping");
                break StopReason::PageLimit;
            }
            Some(next) => cursor = Some(next),
        }
    };

    info!(pages, items = items.len(), in_window, "Fetch finished");
    FetchReport {
        items,
        pages,
        in_window,
        stop,
    }
}
