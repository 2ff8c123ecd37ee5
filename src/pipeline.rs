//! End-to-end run for one target day.
//!
//! 1. **Fetching**: page through the feed ([`fetch_news`])
//! 2. **Filtering**: keep items published inside the target window
//! 3. **Diagnostics**: if nothing matched, report what dates were seen
//! 4. **Output**: project, write the JSON digest, print the summary
//!
//! Only output failures are returned as errors. A fetch that fails part way,
//! or entirely, still produces a digest from whatever was gathered.

use crate::api::FeedSource;
use crate::diagnostics::{DateDiagnostics, diagnose};
use crate::error::OutputError;
use crate::filter::{TargetWindow, filter};
use crate::models::ResultDocument;
use crate::outputs::{json, summary};
use crate::projector::project;
use crate::scrapers::kr36::{FetchOptions, StopReason, fetch_news};
use crate::utils::format_millis;
use chrono::TimeZone;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub path: PathBuf,
    pub document: ResultDocument,
    /// Present only when the feed returned items but none matched.
    pub diagnostics: Option<DateDiagnostics>,
    pub pages: u32,
    pub stop: StopReason,
}

/// Fetch, filter, project and save the news for `window`.
///
/// # Errors
///
/// Returns [`OutputError`] only when the digest cannot be written.
#[instrument(level = "info", skip_all, fields(date = %window.date, output_dir = %output_dir.display()))]
pub async fn run<S, Tz>(
    source: &S,
    options: &FetchOptions,
    window: &TargetWindow,
    output_dir: &Path,
    tz: &Tz,
) -> Result<RunOutcome, OutputError>
where
    S: FeedSource,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = window.date_str();
    info!(
        start = %format_millis(window.start_ms, tz, "%Y-%m-%d %H:%M:%S%.3f"),
        end = %format_millis(window.end_ms, tz, "%Y-%m-%d %H:%M:%S%.3f"),
        "Fetching news for {date}"
    );

    let report = fetch_news(source, options, window).await;
    let partition = filter(report.items, window);
    info!(
        fetched = partition.all.len(),
        matched = partition.matched.len(),
        counted_while_paging = report.in_window,
        "Filtered to target day"
    );

    let diagnostics = if partition.matched.is_empty() {
        let diagnostics = diagnose(&partition.all, tz);
        match &diagnostics {
            Some(d) => {
                warn!(fetched = partition.all.len(), dates = d.histogram.len(), "No items in target window");
                println!("\n{}", d.render(&date, tz));
            }
            None => warn!("Feed returned no items"),
        }
        diagnostics
    } else {
        None
    };

    let document = project(partition.matched, &date);
    let path = json::write_document(&document, output_dir).await?;

    println!("\n{}", summary::render_summary(&document, tz));
    println!("All news for {date} saved to {}", path.display());

    Ok(RunOutcome {
        path,
        document,
        diagnostics,
        pages: report.pages,
        stop: report.stop,
    })
}
