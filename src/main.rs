//! # kr36_news
//!
//! Fetches the 36Kr news flow, keeps the items published on one calendar
//! day, and saves them as a JSON digest.
//!
//! ## Usage
//!
//! ```sh
//! kr36_news --days 1 --pages 5 --size 100 --dir ./data
//! ```
//!
//! ## Architecture
//!
//! The run is a single sequential pipeline:
//! 1. **Fetching**: Page through the gateway with its `pageCallback` cursor
//! 2. **Filtering**: Keep items whose publish time falls in the target day
//! 3. **Diagnostics**: If nothing matched, show which dates were fetched
//! 4. **Output**: Write `36kr_<date>_news.json` and print a summary

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod diagnostics;
mod error;
mod filter;
mod models;
mod outputs;
mod pipeline;
mod projector;
mod scrapers;
mod utils;

use api::HttpFeedClient;
use cli::Cli;
use filter::TargetWindow;
use scrapers::kr36::StopReason;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("kr36_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable before any network traffic
    if let Err(e) = ensure_writable_dir(&args.dir).await {
        error!(
            path = %args.dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let client = HttpFeedClient::new(args.endpoint.clone(), args.timeout())?;
    let window = TargetWindow::days_ago(args.days, &Local);

    let outcome = pipeline::run(&client, &args.fetch_options(), &window, &args.dir, &Local).await?;

    let stop = match &outcome.stop {
        StopReason::CursorExhausted => "cursor_exhausted",
        StopReason::PageLimit => "page_limit",
        StopReason::Failed(e) => {
            warn!(error = %e, "Fetch ended early; digest holds partial results");
            "fetch_failed"
        }
    };
    if let Some(diagnostics) = &outcome.diagnostics {
        let suggested = diagnostics
            .suggestions()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect::<Vec<_>>();
        info!(?suggested, "Target day was empty; dates with data listed above");
    }
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        pages = outcome.pages,
        stop,
        total = outcome.document.total,
        path = %outcome.path.display(),
        "Execution complete"
    );

    Ok(())
}
