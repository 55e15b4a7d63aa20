use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ApplicationStatus, JobApplication};
use super::temporal::start_of_day;

/// Relative window applied to a record's effective date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBucket {
    Today,
    Week,
    Month,
    Quarter,
}

impl DateBucket {
    /// `None` for names that are not a bucket; an absent bucket filters nothing.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "quarter" => Some(Self::Quarter),
            other => {
                debug!(bucket = other, "ignoring unrecognized date bucket");
                None
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    fn contains(self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Today => {
                let today = start_of_day(now);
                date >= today && date < today + Duration::days(1)
            }
            Self::Week => date >= now - Duration::days(7),
            Self::Month => months_before(now, 1).map_or(true, |cutoff| date >= cutoff),
            Self::Quarter => months_before(now, 3).map_or(true, |cutoff| date >= cutoff),
        }
    }
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn months_before(now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_months(Months::new(months))
}

/// Compound filter; every populated criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<String>,
    pub tag: Option<String>,
    pub date_bucket: Option<DateBucket>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        non_empty(&self.search_text).is_some()
            || self.status.is_some()
            || non_empty(&self.source).is_some()
            || non_empty(&self.tag).is_some()
            || self.date_bucket.is_some()
    }

    pub fn matches(&self, record: &JobApplication, now: DateTime<Utc>) -> bool {
        if let Some(search) = non_empty(&self.search_text) {
            let needle = search.to_lowercase();
            let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);
            let found = hit(&record.company)
                || hit(&record.job_title)
                || hit(&record.notes)
                || record.tags.iter().any(hit);
            if !found {
                return false;
            }
        }

        if self.status.is_some_and(|status| record.status != status) {
            return false;
        }

        if non_empty(&self.source).is_some_and(|source| record.source != source) {
            return false;
        }

        if non_empty(&self.tag).is_some_and(|tag| !record.tags.contains(tag)) {
            return false;
        }

        if let Some(bucket) = self.date_bucket {
            if !bucket.contains(record.effective_date(), now) {
                return false;
            }
        }

        true
    }
}

/// Matching records in their original order.
pub fn filter_applications(
    records: &[JobApplication],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<JobApplication> {
    let matched: Vec<JobApplication> = records
        .iter()
        .filter(|record| criteria.matches(record, now))
        .cloned()
        .collect();
    debug!(total = records.len(), matched = matched.len(), "filtered job applications");
    matched
}

/// Sorted, deduplicated, non-blank sources for picker population.
pub fn distinct_sources(records: &[JobApplication]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.source.as_str())
        .filter(|source| !source.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn distinct_tags(records: &[JobApplication]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.tags.iter())
        .filter(|tag| !tag.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
