use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use clap::ValueEnum;

/// The reporting service interprets criteria timestamps in Eastern time; the
/// offset is fixed rather than DST-aware to match what the service expects.
const UTC_OFFSET_SECS: i32 = -5 * 3600;
const UTC_OFFSET_SUFFIX: &str = "-05:00";

/// Time range selection for a report run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    /// Midnight through end of the current day.
    Today,
    /// Most recent Monday through end of the current day.
    ThisWeek,
    /// Rolling window: 7 days ago (midnight) through end of the current day.
    /// Deliberately not the prior calendar week.
    LastWeek,
}

/// Preformatted ISO-8601 boundaries ready for the submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl ReportWindow {
    pub fn range(self) -> TimeRange {
        let offset =
            FixedOffset::east_opt(UTC_OFFSET_SECS).expect("reporting offset is a valid offset");
        self.range_at(Utc::now().with_timezone(&offset))
    }

    pub fn range_at(self, now: DateTime<FixedOffset>) -> TimeRange {
        let today = now.date_naive();
        let start_day = match self {
            ReportWindow::Today => today,
            ReportWindow::ThisWeek => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            ReportWindow::LastWeek => today - Duration::days(7),
        };

        TimeRange {
            start: day_start(start_day),
            end: day_end(today),
        }
    }
}

fn day_start(day: NaiveDate) -> String {
    format!("{}T00:00:00.000{UTC_OFFSET_SUFFIX}", day.format("%Y-%m-%d"))
}

fn day_end(day: NaiveDate) -> String {
    format!("{}T23:59:59.000{UTC_OFFSET_SUFFIX}", day.format("%Y-%m-%d"))
}
