//! Console summary of a saved digest.
//!
//! Renders the category breakdown (largest first) and a preview of the
//! newest records with their local time of day.

use crate::models::ResultDocument;
use crate::utils::format_millis;
use chrono::TimeZone;
use itertools::Itertools;
use std::fmt::{Display, Write};

/// Number of records shown in the preview.
pub const PREVIEW_LEN: usize = 20;

/// Render the summary block printed after a run.
pub fn render_summary<Tz: TimeZone>(document: &ResultDocument, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    let date = &document.date;

    let _ = writeln!(
        out,
        "Fetched {} news items for {date}, by category:",
        document.total
    );
    for (category, count) in document
        .categories
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
    {
        let _ = writeln!(out, "{category}: {count}");
    }

    if document.news.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\nFirst {PREVIEW_LEN} items for {date}:");
    for (i, record) in document.news.iter().take(PREVIEW_LEN).enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] [{}] {}",
            i + 1,
            format_millis(record.publish_time, tz, "%H:%M:%S"),
            record.category,
            record.title
        );
        let _ = writeln!(out, "    URL: {}", record.url);
    }
    out
}
