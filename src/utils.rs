//! Utility functions for timestamps, log-friendly strings, and file system checks.
//!
//! - Epoch-millisecond conversion into a caller-supplied time zone
//! - String truncation for logging response bodies
//! - Output directory validation

use chrono::{DateTime, NaiveDate, TimeZone};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Convert epoch milliseconds into a datetime in `tz`.
///
/// Returns `None` for values outside chrono's representable range.
pub fn datetime_from_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz))
}

/// Calendar date of an epoch-millisecond timestamp in `tz`.
pub fn local_date<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<NaiveDate> {
    datetime_from_millis(millis, tz).map(|dt| dt.date_naive())
}

/// Format an epoch-millisecond timestamp in `tz` with a strftime pattern.
///
/// Out-of-range timestamps are rendered as `"?"`.
pub fn format_millis<Tz: TimeZone>(millis: i64, tz: &Tz, pattern: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match datetime_from_millis(millis, tz) {
        Some(dt) => dt.format(pattern).to_string(),
        None => "?".to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a probe file.
///
/// # Errors
///
/// Returns the underlying IO error if the directory cannot be created or
/// written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // Each of these characters is three bytes long.
        let s = "新闻新闻";
        assert_eq!(truncate_for_log(s, 4), "新…(+9 bytes)");
    }

    #[test]
    fn test_local_date_respects_offset() {
        let utc8 = FixedOffset::east_opt(8 * 3600).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        // 2024-06-10T16:30:00Z is already June 11th in UTC+8.
        let millis = 1_718_037_000_000;
        assert_eq!(
            local_date(millis, &utc8),
            NaiveDate::from_ymd_opt(2024, 6, 11)
        );
        assert_eq!(local_date(millis, &utc), NaiveDate::from_ymd_opt(2024, 6, 10));
    }

    #[test]
    fn test_format_millis() {
        let utc8 = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_millis(1_718_037_000_000, &utc8, "%H:%M:%S"), "00:30:00");
        assert_eq!(format_millis(i64::MAX, &utc8, "%H:%M:%S"), "?");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
