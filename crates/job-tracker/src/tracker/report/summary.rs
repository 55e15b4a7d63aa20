use super::super::domain::{ApplicationStatus, JobApplication};
use super::super::temporal::end_of_day;
use super::views::{DatedApplicationView, StatisticsSummary, StatusShareEntry};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

const RECENT_ACTIVITY_DAYS: i64 = 30;
const UPCOMING_DEADLINE_DAYS: i64 = 7;

#[derive(Debug, Default, Clone)]
pub struct ApplicationStatistics {
    pub total: usize,
    /// Only statuses that occur; see [`ApplicationStatistics::count`] for zero defaults.
    pub by_status: BTreeMap<ApplicationStatus, usize>,
    pub recent_activity: usize,
    pub response_rate: u32,
    pub upcoming_deadlines: Vec<JobApplication>,
    pub follow_ups_due: Vec<JobApplication>,
}

/// Aggregate metrics over `records` as of `now`. Nothing is cached between calls.
pub fn summarize(records: &[JobApplication], now: DateTime<Utc>) -> ApplicationStatistics {
    let mut by_status = BTreeMap::new();
    for record in records {
        *by_status.entry(record.status).or_insert(0) += 1;
    }

    let recent_cutoff = now - Duration::days(RECENT_ACTIVITY_DAYS);
    let recent_activity = records
        .iter()
        .filter(|record| record.created_at >= recent_cutoff)
        .count();

    let count = |status: ApplicationStatus| by_status.get(&status).copied().unwrap_or(0);
    let applied = count(ApplicationStatus::Applied);
    let responses = count(ApplicationStatus::Interview) + count(ApplicationStatus::Offer);
    // Status buckets, not a funnel: an Interview record is not also counted as Applied.
    let response_rate = if applied > 0 {
        (100.0 * responses as f64 / applied as f64).round() as u32
    } else {
        0
    };

    let horizon = now + Duration::days(UPCOMING_DEADLINE_DAYS);
    let mut upcoming_deadlines: Vec<JobApplication> = records
        .iter()
        .filter(|record| {
            record
                .deadline
                .is_some_and(|deadline| deadline >= now && deadline <= horizon)
        })
        .cloned()
        .collect();
    upcoming_deadlines.sort_by_key(|record| record.deadline);

    let today_end = end_of_day(now);
    let mut follow_ups_due: Vec<JobApplication> = records
        .iter()
        .filter(|record| record.follow_up_date.is_some_and(|date| date <= today_end))
        .cloned()
        .collect();
    follow_ups_due.sort_by_key(|record| record.follow_up_date);

    ApplicationStatistics {
        total: records.len(),
        by_status,
        recent_activity,
        response_rate,
        upcoming_deadlines,
        follow_ups_due,
    }
}

impl ApplicationStatistics {
    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// One entry per status in pipeline order, zero-filled.
    pub fn status_breakdown(&self) -> Vec<StatusShareEntry> {
        ApplicationStatus::ordered()
            .into_iter()
            .map(|status| {
                let count = self.count(status);
                let percentage = if self.total > 0 {
                    count as f32 / self.total as f32 * 100.0
                } else {
                    0.0
                };
                StatusShareEntry {
                    status,
                    label: status.label(),
                    count,
                    percentage,
                }
            })
            .collect()
    }

    pub fn summary(&self) -> StatisticsSummary {
        let upcoming_deadlines = self
            .upcoming_deadlines
            .iter()
            .filter_map(|record| dated_view(record, record.deadline))
            .collect();

        let follow_ups_due = self
            .follow_ups_due
            .iter()
            .filter_map(|record| dated_view(record, record.follow_up_date))
            .collect();

        StatisticsSummary {
            total: self.total,
            recent_activity: self.recent_activity,
            response_rate: self.response_rate,
            status_breakdown: self.status_breakdown(),
            upcoming_deadlines,
            follow_ups_due,
        }
    }
}

fn dated_view(record: &JobApplication, date: Option<DateTime<Utc>>) -> Option<DatedApplicationView> {
    date.map(|date| DatedApplicationView {
        id: record.id.clone(),
        company: record.company.clone(),
        job_title: record.job_title.clone(),
        date,
    })
}
