use std::fmt;

use chrono::{DateTime, Utc};

use super::domain::{ApplicationPatch, NewApplication};
use super::temporal::parse_instant;

/// Problems with user input, reported before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompany,
    #[error("Job title is required")]
    MissingJobTitle,
    #[error("Please enter a valid URL ('{value}': {reason})")]
    InvalidResumeUrl { value: String, reason: String },
    #[error("Deadline cannot be in the past ({deadline})")]
    DeadlineInPast { deadline: String },
    #[error("{field} is not a valid date: '{value}'")]
    InvalidDate { field: &'static str, value: String },
}

/// Every problem found in one submission, so all of them can be shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(value: ValidationError) -> Self {
        Self(vec![value])
    }
}

pub(crate) fn check_resume_url(value: &str) -> Result<(), ValidationError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|err| ValidationError::InvalidResumeUrl {
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// Reads a typed date for `field`. Blank input means the date is absent.
pub fn parse_date_input(
    field: &'static str,
    raw: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_instant(trimmed)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

impl NewApplication {
    /// Trimmed copy of the submission; a blank resume URL becomes absent.
    pub fn sanitized(mut self) -> Self {
        self.company = self.company.trim().to_string();
        self.job_title = self.job_title.trim().to_string();
        self.source = self.source.trim().to_string();
        self.notes = self.notes.trim().to_string();
        self.resume_url = self
            .resume_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }

    /// Rules the store enforces for every new record.
    pub fn validate_required(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self.company.trim().is_empty() {
            errors.push(ValidationError::MissingCompany);
        }
        if self.job_title.trim().is_empty() {
            errors.push(ValidationError::MissingJobTitle);
        }
        if let Some(url) = &self.resume_url {
            if let Err(err) = check_resume_url(url) {
                errors.push(err);
            }
        }
        ValidationErrors(errors).into_result()
    }

    /// Required-field rules plus the soft deadline check applied at the point of entry.
    pub fn validate_entry(&self, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate_required() {
            Ok(()) => Vec::new(),
            Err(ValidationErrors(errors)) => errors,
        };
        errors.extend(self.deadline.and_then(|deadline| past_deadline(deadline, now)));
        ValidationErrors(errors).into_result()
    }
}

fn past_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Option<ValidationError> {
    (deadline.date_naive() < now.date_naive()).then(|| ValidationError::DeadlineInPast {
        deadline: deadline.date_naive().to_string(),
    })
}

impl ApplicationPatch {
    /// Fields a patch sets must satisfy the same rules as a new record.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        if self
            .company
            .as_deref()
            .is_some_and(|company| company.trim().is_empty())
        {
            errors.push(ValidationError::MissingCompany);
        }
        if self
            .job_title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            errors.push(ValidationError::MissingJobTitle);
        }
        if let Some(Some(url)) = &self.resume_url {
            if let Err(err) = check_resume_url(url) {
                errors.push(err);
            }
        }
        ValidationErrors(errors).into_result()
    }

    /// Patch rules plus the past-deadline check when a new deadline is supplied.
    pub fn validate_entry(&self, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(ValidationErrors(errors)) => errors,
        };
        if let Some(Some(deadline)) = self.deadline {
            errors.extend(past_deadline(deadline, now));
        }
        ValidationErrors(errors).into_result()
    }

    /// Trims supplied text fields; a blank resume URL clears the stored one.
    pub fn sanitized(mut self) -> Self {
        let trim = |value: String| value.trim().to_string();
        self.company = self.company.map(trim);
        self.job_title = self.job_title.map(trim);
        self.source = self.source.map(trim);
        self.notes = self.notes.map(trim);
        self.resume_url = self.resume_url.map(|url| {
            url.map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
        });
        self
    }
}
