use super::super::domain::{ApplicationId, ApplicationStatus, JobApplication};
use super::super::temporal::{deadline_status, follow_up_status, DeadlineStatus, FollowUpStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusShareEntry {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub count: usize,
    pub percentage: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedApplicationView {
    pub id: ApplicationId,
    pub company: String,
    pub job_title: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub total: usize,
    pub recent_activity: usize,
    pub response_rate: u32,
    pub status_breakdown: Vec<StatusShareEntry>,
    pub upcoming_deadlines: Vec<DatedApplicationView>,
    pub follow_ups_due: Vec<DatedApplicationView>,
}

/// Card-level view: the record plus its derived deadline and follow-up indicators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationCardView {
    #[serde(flatten)]
    pub application: JobApplication,
    pub deadline_status: DeadlineStatus,
    pub follow_up_status: FollowUpStatus,
}

impl ApplicationCardView {
    pub fn new(application: &JobApplication, now: DateTime<Utc>) -> Self {
        Self {
            deadline_status: deadline_status(now, application.deadline),
            follow_up_status: follow_up_status(now, application.follow_up_date),
            application: application.clone(),
        }
    }
}
