//! CSV export of application records.

mod summary;

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::JobApplication;
use super::temporal::{days_until, deadline_countdown, format_short_date};

pub use summary::{
    summarize_export, validate_for_export, DateRange, ExportSummary, ExportValidation, TagCount,
};

/// Text form of [`ExportOutput::NoData`].
pub const NO_DATA_SENTINEL: &str = "No data to export";

const HEADERS: [&str; 11] = [
    "Company",
    "Job Title",
    "Status",
    "Source",
    "Application Date",
    "Deadline",
    "Follow-up Date",
    "Days Until Deadline",
    "Tags",
    "Resume URL",
    "Notes",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Buffer(String),
    #[error("CSV output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result of an export. `NoData` must not be written out as a file body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    NoData,
    Csv(String),
}

impl ExportOutput {
    pub fn is_empty(&self) -> bool {
        matches!(self, ExportOutput::NoData)
    }

    pub fn as_text(&self) -> &str {
        match self {
            ExportOutput::NoData => NO_DATA_SENTINEL,
            ExportOutput::Csv(body) => body,
        }
    }

    pub fn into_csv(self) -> Option<String> {
        match self {
            ExportOutput::NoData => None,
            ExportOutput::Csv(body) => Some(body),
        }
    }
}

/// Flattens `records` into CSV with a header row.
///
/// Fields holding a comma, double quote, or line break are quoted with inner
/// quotes doubled; everything else is emitted verbatim. Rows are separated by
/// `\n` with no trailing terminator.
pub fn to_delimited_text(
    records: &[JobApplication],
    now: DateTime<Utc>,
) -> Result<ExportOutput, ExportError> {
    if records.is_empty() {
        return Ok(ExportOutput::NoData);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for record in records {
        writer.write_record(row(record, now))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    let mut body = String::from_utf8(bytes)?;
    if body.ends_with('\n') {
        body.pop();
    }

    tracing::debug!(rows = records.len(), bytes = body.len(), "exported job applications");
    Ok(ExportOutput::Csv(body))
}

fn row(record: &JobApplication, now: DateTime<Utc>) -> [String; 11] {
    let short_date = |date: Option<DateTime<Utc>>| date.map(format_short_date).unwrap_or_default();

    [
        record.company.clone(),
        record.job_title.clone(),
        record.status.label().to_string(),
        record.source.clone(),
        short_date(record.date_applied),
        short_date(record.deadline),
        short_date(record.follow_up_date),
        deadline_countdown(days_until(now, record.deadline)),
        record.tags.join("; "),
        record.resume_url.clone().unwrap_or_default(),
        record.notes.clone(),
    ]
}

/// `job-applications-YYYY-MM-DD.csv` for the given day.
pub fn suggested_filename(today: NaiveDate) -> String {
    format!("job-applications-{}.csv", today.format("%Y-%m-%d"))
}
