//! Date-distribution report for runs that matched nothing.
//!
//! When the target day is empty but the feed did return items, the report
//! shows the span of publish times fetched and how many items fell on each
//! local calendar day, so the operator can pick a `--days` value that has
//! data.

use crate::models::RawItem;
use crate::utils::{format_millis, local_date};
use chrono::{NaiveDate, TimeZone};
use itertools::{Itertools, MinMaxResult};
use std::fmt::{Display, Write};

const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Summary of the publish dates of everything fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDiagnostics {
    pub earliest_ms: i64,
    pub latest_ms: i64,
    /// Item count per local date, newest date first.
    pub histogram: Vec<(NaiveDate, usize)>,
}

impl DateDiagnostics {
    /// Dates that have at least one item, newest first.
    pub fn suggestions(&self) -> Vec<NaiveDate> {
        self.histogram.iter().map(|(date, _)| *date).collect()
    }

    /// Human-readable report explaining why `target_date` came up empty.
    pub fn render<Tz: TimeZone>(&self, target_date: &str, tz: &Tz) -> String
    where
        Tz::Offset: Display,
    {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "No news found for {target_date}. Fetched items span:"
        );
        let _ = writeln!(out, "Earliest: {}", format_millis(self.earliest_ms, tz, INSTANT_FORMAT));
        let _ = writeln!(out, "Latest:   {}", format_millis(self.latest_ms, tz, INSTANT_FORMAT));
        let _ = writeln!(out, "\nDate distribution of fetched items:");
        for (date, count) in &self.histogram {
            let _ = writeln!(out, "{}: {count}", date.format("%Y-%m-%d"));
        }
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(
                out,
                "\nTry one of these dates instead: {}",
                suggestions.iter().map(|d| d.format("%Y-%m-%d")).join(", ")
            );
        }
        out
    }
}

/// Build the date report for `all`, in the calendar of `tz`.
///
/// Returns `None` when nothing was fetched.
pub fn diagnose<Tz: TimeZone>(all: &[RawItem], tz: &Tz) -> Option<DateDiagnostics> {
    let (earliest_ms, latest_ms) = match all.iter().map(RawItem::publish_time).minmax() {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(t) => (t, t),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let histogram = all
        .iter()
        .filter_map(|item| local_date(item.publish_time(), tz))
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .collect();

    Some(DateDiagnostics {
        earliest_ms,
        latest_ms,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::kr36::tests::item;
    use chrono::FixedOffset;

    impl DateDiagnostics {
        pub(crate) fn count_on(&self, date: NaiveDate) -> usize {
            self.histogram
                .iter()
                .find(|(d, _)| *d == date)
                .map_or(0, |(_, count)| *count)
        }
    }

    fn utc8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    // 2024-06-11T00:00:00+08:00
    const JUNE_11: i64 = 1_718_035_200_000;
    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn test_diagnose_nothing_fetched() {
        assert_eq!(diagnose(&[], &utc8()), None);
    }

    #[test]
    fn test_histogram_counts_per_local_date_newest_first() {
        let items = vec![
            item(JUNE_11 - DAY_MS + 10, "june 10"),
            item(JUNE_11 + 3_600_000, "june 11 a"),
            item(JUNE_11 + 7_200_000, "june 11 b"),
            item(JUNE_11 - 1, "june 10 late"),
            item(JUNE_11 + DAY_MS, "june 12"),
        ];

        let report = diagnose(&items, &utc8()).unwrap();

        assert_eq!(
            report.histogram,
            vec![(day(12), 1), (day(11), 2), (day(10), 2)]
        );
        assert_eq!(report.earliest_ms, JUNE_11 - DAY_MS + 10);
        assert_eq!(report.latest_ms, JUNE_11 + DAY_MS);
        assert_eq!(report.suggestions(), vec![day(12), day(11), day(10)]);
        assert_eq!(report.count_on(day(11)), 2);
        assert_eq!(report.count_on(day(9)), 0);
    }

    #[test]
    fn test_single_item_span() {
        let report = diagnose(&[item(JUNE_11, "only")], &utc8()).unwrap();
        assert_eq!(report.earliest_ms, report.latest_ms);
        assert_eq!(report.histogram, vec![(day(11), 1)]);
    }

    #[test]
    fn test_render_lists_dates_and_suggestions() {
        let items = vec![item(JUNE_11, "a"), item(JUNE_11 - DAY_MS, "b")];
        let report = diagnose(&items, &utc8()).unwrap();

        let text = report.render("2024-06-15", &utc8());

        assert!(text.contains("No news found for 2024-06-15"));
        assert!(text.contains("Earliest: 2024-06-10 00:00:00"));
        assert!(text.contains("Latest:   2024-06-11 00:00:00"));
        assert!(text.contains("2024-06-11: 1\n2024-06-10: 1"));
        assert!(text.contains("Try one of these dates instead: 2024-06-11, 2024-06-10"));
    }
}
