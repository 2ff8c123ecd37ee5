//! Day-window filtering.
//!
//! A [`TargetWindow`] covers one calendar day in a given time zone, from
//! 00:00:00.000 to 23:59:59.999 inclusive, expressed in epoch milliseconds.

use crate::models::RawItem;
use chrono::{Days, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

/// Inclusive millisecond bounds of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWindow {
    pub date: NaiveDate,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TargetWindow {
    /// The window for `date` as observed in `tz`.
    ///
    /// The end bound is one millisecond before the next local midnight, so
    /// days that gain or lose an hour to DST keep their true length.
    pub fn for_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let start_ms = local_midnight_millis(tz, date);
        let end_ms = match date.succ_opt() {
            Some(next) => local_midnight_millis(tz, next) - 1,
            None => start_ms + 86_400_000 - 1,
        };
        Self {
            date,
            start_ms,
            end_ms,
        }
    }

    /// The window for the day `days_ago` days before today in `tz`.
    pub fn days_ago<Tz: TimeZone>(days_ago: u32, tz: &Tz) -> Self {
        let today = Utc::now().with_timezone(tz).date_naive();
        Self::days_before(today, days_ago, tz)
    }

    /// The window for the day `days_ago` days before `today`.
    pub fn days_before<Tz: TimeZone>(today: NaiveDate, days_ago: u32, tz: &Tz) -> Self {
        let date = today
            .checked_sub_days(Days::new(u64::from(days_ago)))
            .unwrap_or(NaiveDate::MIN);
        Self::for_day(date, tz)
    }

    /// `true` when `millis` lies within the window, bounds included.
    pub fn contains(&self, millis: i64) -> bool {
        self.start_ms <= millis && millis <= self.end_ms
    }

    /// The date as `YYYY-MM-DD`.
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Epoch milliseconds of local midnight starting `date`.
///
/// Ambiguous midnights take the earlier instant. A midnight skipped by a
/// DST jump resolves to the first local instant after the gap, i.e. the
/// moment the clocks change.
fn local_midnight_millis<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(early, _) => early.timestamp_millis(),
        LocalResult::None => (1..=24 * 60)
            .find_map(|m| {
                tz.from_local_datetime(&(naive + TimeDelta::minutes(m)))
                    .earliest()
            })
            .map_or_else(
                || naive.and_utc().timestamp_millis(),
                |dt| dt.timestamp_millis(),
            ),
    }
}

/// Items split by the target window.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// In-window items, in fetch order, duplicates kept.
    pub matched: Vec<RawItem>,
    /// Everything fetched.
    pub all: Vec<RawItem>,
}

/// Split `items` into those inside `window` and the full set.
///
/// No de-duplication happens: an item the feed returned twice is counted
/// twice.
pub fn filter(items: Vec<RawItem>, window: &TargetWindow) -> Partition {
    let matched = items
        .iter()
        .filter(|item| window.contains(item.publish_time()))
        .cloned()
        .collect();
    Partition { matched, all: items }
}
