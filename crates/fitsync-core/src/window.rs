//! Two-day lookback window used as the Google Fit dataset key.

use chrono::{Days, NaiveDate, NaiveDateTime};
use std::fmt;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Midnight of the day before yesterday and midnight of yesterday,
/// in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start_ns: i64,
    end_ns: i64,
}

impl TimeWindow {
    pub fn start_ns(&self) -> i64 {
        self.start_ns
    }

    pub fn end_ns(&self) -> i64 {
        self.end_ns
    }

    /// Start bound as an integer string with no fractional digits.
    pub fn start(&self) -> String {
        self.start_ns.to_string()
    }

    pub fn end(&self) -> String {
        self.end_ns.to_string()
    }

    /// Dataset key in the form `{start}-{end}`.
    pub fn dataset_id(&self) -> String {
        format!("{}-{}", self.start_ns, self.end_ns)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dataset_id())
    }
}

/// Compute the window relative to `today`.
///
/// Midnights are naive wall-clock times measured against the naive epoch,
/// so the result does not depend on the host timezone. Conversion is done
/// in integer nanoseconds.
pub fn compute_window(today: NaiveDate) -> TimeWindow {
    let day_before_yesterday = today - Days::new(2);
    let yesterday = today - Days::new(1);

    let start_ns = midnight_ns(day_before_yesterday);
    let end_ns = midnight_ns(yesterday);

    tracing::info!(
        day_before_yesterday = %day_before_yesterday,
        yesterday = %yesterday,
        "Time window: {start_ns} - {end_ns}"
    );

    TimeWindow { start_ns, end_ns }
}

fn midnight_ns(day: NaiveDate) -> i64 {
    let midnight: NaiveDateTime = day.and_time(chrono::NaiveTime::MIN);
    midnight.and_utc().timestamp() * NANOS_PER_SECOND
}
