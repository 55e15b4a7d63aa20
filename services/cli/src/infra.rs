use chrono::{DateTime, Utc};
use job_tracker::config::AppConfig;
use job_tracker::tracker::{
    parse_date_input, ApplicationRepository, ApplicationStatus, Clock, CollectionStore, FileStore,
    FixedClock, SystemClock, ValidationError,
};
use std::sync::Arc;

/// The live system clock, or an instant pinned with `--now`.
#[derive(Debug)]
pub(crate) enum CliClock {
    System(SystemClock),
    Pinned(FixedClock),
}

impl CliClock {
    pub(crate) fn from_override(now: Option<DateTime<Utc>>) -> Self {
        match now {
            Some(now) => Self::Pinned(FixedClock::new(now)),
            None => Self::System(SystemClock),
        }
    }
}

impl Clock for CliClock {
    fn now(&self) -> DateTime<Utc> {
        match self {
            CliClock::System(clock) => clock.now(),
            CliClock::Pinned(clock) => clock.now(),
        }
    }
}

pub(crate) type Repository<S = FileStore> = ApplicationRepository<S, CliClock>;

pub(crate) fn open_repository(config: &AppConfig, now: Option<DateTime<Utc>>) -> Repository {
    let store = FileStore::new(config.storage.data_dir.clone());
    with_store(store, now)
}

pub(crate) fn with_store<S: CollectionStore>(store: S, now: Option<DateTime<Utc>>) -> Repository<S> {
    ApplicationRepository::new(Arc::new(store), Arc::new(CliClock::from_override(now)))
}

pub(crate) fn parse_instant_arg(raw: &str) -> Result<DateTime<Utc>, String> {
    match parse_date_input("--now", raw) {
        Ok(Some(at)) => Ok(at),
        Ok(None) => Err("expected a date, got an empty value".to_string()),
        Err(err) => Err(format!("{err}; use YYYY-MM-DD or an RFC 3339 timestamp")),
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse::<ApplicationStatus>().map_err(|err| err.to_string())
}

/// Parses an optional typed date, collecting the problem instead of failing fast.
pub(crate) fn typed_date(
    field: &'static str,
    raw: Option<&str>,
    errors: &mut Vec<ValidationError>,
) -> Option<DateTime<Utc>> {
    match parse_date_input(field, raw?) {
        Ok(date) => date,
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parser_lists_choices_on_error() {
        assert_eq!(parse_status(" offer "), Ok(ApplicationStatus::Offer));
        let err = parse_status("ghosted").expect_err("unknown status");
        assert!(err.contains("expected one of Wishlist, Applied, Interview, Offer, Rejected"));
    }

    #[test]
    fn typed_dates_collect_errors() {
        let mut errors = Vec::new();
        assert!(typed_date("deadline", None, &mut errors).is_none());
        assert!(typed_date("deadline", Some("2025-10-01"), &mut errors).is_some());
        assert!(typed_date("follow-up date", Some("soon"), &mut errors).is_none());
        assert_eq!(
            errors,
            vec![ValidationError::InvalidDate {
                field: "follow-up date",
                value: "soon".to_string(),
            }]
        );
    }

    #[test]
    fn pinned_clock_overrides_system_time() {
        let pinned = parse_instant_arg("2025-01-02").expect("valid date");
        assert_eq!(CliClock::from_override(Some(pinned)).now(), pinned);
        assert!(parse_instant_arg("yesterday").is_err());
    }
}
