//! Command-line interface definitions.
//!
//! All arguments can be provided via command-line flags or environment variables.

use crate::api::DEFAULT_ENDPOINT;
use crate::scrapers::kr36::FetchOptions;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Fetch one day of 36Kr news and save it as JSON.
///
/// # Examples
///
/// ```sh
/// # Today's news into ./data
/// kr36_news
///
/// # Yesterday, up to 10 pages of 50 items
/// kr36_news --days 1 --pages 10 --size 50 --dir ./archive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// How many days back to fetch: 0 is today, 1 is yesterday, and so on
    #[arg(short, long, env = "KR36_DAYS", default_value_t = 0)]
    pub days: u32,

    /// Maximum number of pages to request
    #[arg(
        short,
        long,
        env = "KR36_PAGES",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pages: u32,

    /// Items requested per page
    #[arg(
        short,
        long,
        env = "KR36_PAGE_SIZE",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub size: u32,

    /// Directory the JSON digest is written to (created if missing)
    #[arg(long, env = "KR36_OUTPUT_DIR", default_value = "./data")]
    pub dir: PathBuf,

    /// Pause between page requests, in milliseconds
    #[arg(long, env = "KR36_PAGE_DELAY_MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(
        long,
        env = "KR36_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// News-flow gateway endpoint
    #[arg(long, env = "KR36_FEED_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,
}

impl Cli {
    /// Paging options derived from the arguments.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            page_size: self.size,
            max_pages: self.pages,
            page_delay: Duration::from_millis(self.delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
