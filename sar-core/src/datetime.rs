//! Timestamp rendering for responses
//!
//! Timestamps are stored in UTC and rendered in the configured application
//! timezone. Rendering is one-way: responses carry strings, not instants.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Format used for creation/update timestamps
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for calendar dates (collect date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders stored timestamps in a fixed timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatetimeFormatter {
    tz: Tz,
}

impl DatetimeFormatter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Current instant, truncated to whole microseconds so it survives a
    /// round trip through a Postgres `TIMESTAMPTZ` unchanged.
    pub fn now() -> DateTime<Utc> {
        let now = Utc::now();
        DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
    }

    pub fn prettify_date_time(&self, value: DateTime<Utc>) -> String {
        value.with_timezone(&self.tz).format(DATE_TIME_FORMAT).to_string()
    }

    pub fn prettify_date(&self, value: NaiveDate) -> String {
        value.format(DATE_FORMAT).to_string()
    }
}

impl Default for DatetimeFormatter {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}
