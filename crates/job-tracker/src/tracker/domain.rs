use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for tracked applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where an application currently sits in the user's pipeline.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ApplicationStatus {
    #[default]
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Wishlist => "Wishlist",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    pub const fn ordered() -> [Self; 5] {
        [
            ApplicationStatus::Wishlist,
            ApplicationStatus::Applied,
            ApplicationStatus::Interview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ]
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}' (expected one of Wishlist, Applied, Interview, Offer, Rejected)")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Insertion-ordered tag collection without duplicates or blank entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trimmed tag, returning `false` when it was blank or already present.
    pub fn insert(&mut self, tag: impl AsRef<str>) -> bool {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != tag);
        self.0.len() != before
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        for tag in iter {
            tags.insert(tag);
        }
        tags
    }
}

impl From<Vec<String>> for TagSet {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(value: TagSet) -> Self {
        value.0
    }
}

/// A single tracked job application as owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub source: String,
    pub deadline: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub date_applied: Option<DateTime<Utc>>,
    pub notes: String,
    pub resume_url: Option<String>,
    pub tags: TagSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Date used by relative date filters: when the user applied, else when the record was made.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.date_applied.unwrap_or(self.created_at)
    }

    /// Merges `patch` and stamps `now` as the update time.
    ///
    /// `date_applied` is only ever set, on the first transition into
    /// [`ApplicationStatus::Applied`]; moving away from Applied keeps it.
    pub(crate) fn apply(&mut self, patch: ApplicationPatch, now: DateTime<Utc>) {
        let ApplicationPatch {
            company,
            job_title,
            status,
            source,
            deadline,
            follow_up_date,
            notes,
            resume_url,
            tags,
        } = patch;

        if let Some(company) = company {
            self.company = company;
        }
        if let Some(job_title) = job_title {
            self.job_title = job_title;
        }
        if let Some(status) = status {
            if status == ApplicationStatus::Applied
                && self.status != ApplicationStatus::Applied
                && self.date_applied.is_none()
            {
                self.date_applied = Some(now);
            }
            self.status = status;
        }
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(deadline) = deadline {
            self.deadline = deadline;
        }
        if let Some(follow_up_date) = follow_up_date {
            self.follow_up_date = follow_up_date;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(resume_url) = resume_url {
            self.resume_url = resume_url;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

/// User supplied fields for a new application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewApplication {
    pub company: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub source: String,
    pub deadline: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub resume_url: Option<String>,
    pub tags: TagSet,
}

/// Partial update. Outer `None` leaves a field untouched; for clearable fields
/// `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub source: Option<String>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub follow_up_date: Option<Option<DateTime<Utc>>>,
    pub notes: Option<String>,
    pub resume_url: Option<Option<String>>,
    pub tags: Option<TagSet>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
