//! Day-granularity date math behind deadline urgency and follow-up reminders.
//!
//! Every function takes the reference instant explicitly so callers decide
//! whether "now" comes from the live clock or a fixed one. Both sides of a
//! comparison are normalized to the start of their UTC day, which keeps
//! "3 days left" stable regardless of the time of day it is asked.

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Source of the reference instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock mutex poisoned") = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = at
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    Utc.from_utc_datetime(&midnight)
}

/// Last representable millisecond of the day containing `at`.
pub fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) + Duration::days(1) - Duration::milliseconds(1)
}

/// Whole days from `now` to `target`, both normalized to midnight. Negative means past.
pub fn days_until(now: DateTime<Utc>, target: Option<DateTime<Utc>>) -> Option<i64> {
    target.map(|target| {
        target
            .date_naive()
            .signed_duration_since(now.date_naive())
            .num_days()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    None,
    Overdue,
    Today,
    Urgent,
    Soon,
    Normal,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Urgency::None => "none",
            Urgency::Overdue => "overdue",
            Urgency::Today => "today",
            Urgency::Urgent => "urgent",
            Urgency::Soon => "soon",
            Urgency::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineStatus {
    pub urgency: Urgency,
    pub days: Option<i64>,
    pub message: String,
}

pub fn deadline_status(now: DateTime<Utc>, deadline: Option<DateTime<Utc>>) -> DeadlineStatus {
    let days = days_until(now, deadline);
    let (urgency, message) = match days {
        None => (Urgency::None, "No deadline".to_string()),
        Some(days) if days < 0 => (Urgency::Overdue, format!("{} days overdue", days.abs())),
        Some(0) => (Urgency::Today, "Due today".to_string()),
        Some(days) if days <= 3 => (Urgency::Urgent, format!("{days} days left")),
        Some(days) if days <= 7 => (Urgency::Soon, format!("{days} days left")),
        Some(days) => (Urgency::Normal, format!("{days} days left")),
    };

    DeadlineStatus {
        urgency,
        days,
        message,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpStatus {
    pub is_due: bool,
    pub message: String,
}

impl FollowUpStatus {
    fn not_due() -> Self {
        Self {
            is_due: false,
            message: String::new(),
        }
    }

    fn due(message: String) -> Self {
        Self {
            is_due: true,
            message,
        }
    }
}

/// Card-level follow-up indicator: overdue, today, or within the next two days.
pub fn follow_up_status(now: DateTime<Utc>, follow_up: Option<DateTime<Utc>>) -> FollowUpStatus {
    match days_until(now, follow_up) {
        None => FollowUpStatus::not_due(),
        Some(days) if days < 0 => {
            FollowUpStatus::due(format!("overdue by {} days", days.abs()))
        }
        Some(0) => FollowUpStatus::due("due today".to_string()),
        Some(days) if days <= 2 => FollowUpStatus::due(format!("in {days} days")),
        Some(_) => FollowUpStatus::not_due(),
    }
}

/// Reminder-banner rule: due today or any day before.
pub fn is_follow_up_due(now: DateTime<Utc>, follow_up: Option<DateTime<Utc>>) -> bool {
    follow_up.is_some_and(|date| date.date_naive() <= now.date_naive())
}

/// Countdown text for the export's "Days Until Deadline" column.
pub fn deadline_countdown(days: Option<i64>) -> String {
    match days {
        None => String::new(),
        Some(days) if days < 0 => format!("{} days overdue", days.abs()),
        Some(0) => "Due today".to_string(),
        Some(days) => format!("{days} days"),
    }
}

/// Human phrasing of how far `at` lies from `now`, counted in whole 24 hour periods.
pub fn relative_time(now: DateTime<Utc>, at: DateTime<Utc>) -> String {
    match now.signed_duration_since(at).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        -1 => "Tomorrow".to_string(),
        days if days > 0 => format!("{days} days ago"),
        days => format!("in {} days", days.abs()),
    }
}

/// `M/D/YYYY`, the compact form used in exports.
pub fn format_short_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// `Mon DD, YYYY`, the form used in listings.
pub fn format_display_date(at: DateTime<Utc>) -> String {
    at.format("%b %d, %Y").to_string()
}

/// Lenient parse of stored or typed dates. Unparsable input is treated as absent.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 14, 45, 0)
            .single()
            .expect("valid now")
    }

    fn in_days(days: i64) -> Option<DateTime<Utc>> {
        // Early morning so the raw instant difference disagrees with the day difference.
        Some(start_of_day(now()) + Duration::days(days) + Duration::hours(1))
    }

    #[test]
    fn days_until_ignores_time_of_day() {
        assert_eq!(days_until(now(), in_days(3)), Some(3));
        assert_eq!(days_until(now(), in_days(0)), Some(0));
        assert_eq!(days_until(now(), in_days(-2)), Some(-2));
        assert_eq!(days_until(now(), None), None);
    }

    #[test]
    fn deadline_buckets_match_boundaries() {
        let overdue = deadline_status(now(), in_days(-1));
        assert_eq!(overdue.urgency, Urgency::Overdue);
        assert_eq!(overdue.message, "1 days overdue");

        let today = deadline_status(now(), in_days(0));
        assert_eq!(today.urgency, Urgency::Today);
        assert_eq!(today.message, "Due today");

        let urgent = deadline_status(now(), in_days(3));
        assert_eq!(urgent.urgency, Urgency::Urgent);
        assert_eq!(urgent.message, "3 days left");

        assert_eq!(deadline_status(now(), in_days(4)).urgency, Urgency::Soon);
        assert_eq!(deadline_status(now(), in_days(7)).urgency, Urgency::Soon);
        assert_eq!(deadline_status(now(), in_days(8)).urgency, Urgency::Normal);

        let none = deadline_status(now(), None);
        assert_eq!(none.urgency, Urgency::None);
        assert_eq!(none.days, None);
    }

    #[test]
    fn follow_up_status_uses_two_day_window() {
        assert_eq!(
            follow_up_status(now(), in_days(-3)),
            FollowUpStatus {
                is_due: true,
                message: "overdue by 3 days".to_string()
            }
        );
        assert_eq!(follow_up_status(now(), in_days(0)).message, "due today");
        assert_eq!(follow_up_status(now(), in_days(2)).message, "in 2 days");
        assert!(follow_up_status(now(), in_days(2)).is_due);
        assert!(!follow_up_status(now(), in_days(3)).is_due);
        assert!(!follow_up_status(now(), None).is_due);
    }

    #[test]
    fn follow_up_due_has_no_lookahead() {
        assert!(is_follow_up_due(now(), in_days(0)));
        assert!(is_follow_up_due(now(), in_days(-40)));
        assert!(!is_follow_up_due(now(), in_days(1)));
        assert!(!is_follow_up_due(now(), None));
    }

    #[test]
    fn end_of_day_is_last_millisecond() {
        let end = end_of_day(now());
        assert_eq!(end.date_naive(), now().date_naive());
        assert_eq!((end + Duration::milliseconds(1)).date_naive(), now().date_naive().succ_opt().expect("next day"));
    }

    #[test]
    fn countdown_text() {
        assert_eq!(deadline_countdown(Some(-4)), "4 days overdue");
        assert_eq!(deadline_countdown(Some(0)), "Due today");
        assert_eq!(deadline_countdown(Some(5)), "5 days");
        assert_eq!(deadline_countdown(None), "");
    }

    #[test]
    fn relative_time_counts_whole_days() {
        assert_eq!(relative_time(now(), now() - Duration::hours(5)), "Today");
        assert_eq!(relative_time(now(), now() - Duration::hours(30)), "Yesterday");
        assert_eq!(relative_time(now(), now() + Duration::hours(30)), "Tomorrow");
        assert_eq!(relative_time(now(), now() - Duration::days(4)), "4 days ago");
        assert_eq!(relative_time(now(), now() + Duration::days(6)), "in 6 days");
    }

    #[test]
    fn parse_instant_accepts_common_shapes() {
        let midnight = parse_instant("2025-07-01").expect("plain date parses");
        assert_eq!(midnight, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).single().expect("valid"));
        assert!(parse_instant("2025-07-01T12:30:00.000Z").is_some());
        assert!(parse_instant("2025-07-01T12:30:00").is_some());
        assert_eq!(parse_instant("not a date"), None);
        assert_eq!(parse_instant("   "), None);
    }

    #[test]
    fn formats_dates() {
        assert_eq!(format_short_date(now()), "6/15/2025");
        assert_eq!(format_display_date(now()), "Jun 15, 2025");
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(now());
        clock.advance(Duration::days(2));
        assert_eq!(clock.now(), now() + Duration::days(2));
    }
}
