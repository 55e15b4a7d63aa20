use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracker::domain::{ApplicationStatus, JobApplication};

const TOP_TAG_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// What an export is about to contain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_jobs: usize,
    pub status_breakdown: BTreeMap<ApplicationStatus, usize>,
    pub date_range: Option<DateRange>,
    pub most_common_source: Option<String>,
    pub most_common_tags: Vec<TagCount>,
}

pub fn summarize_export(records: &[JobApplication]) -> ExportSummary {
    if records.is_empty() {
        return ExportSummary::default();
    }

    let mut status_breakdown = BTreeMap::new();
    for record in records {
        *status_breakdown.entry(record.status).or_insert(0) += 1;
    }

    let earliest = records.iter().map(JobApplication::effective_date).min();
    let latest = records.iter().map(JobApplication::effective_date).max();
    let date_range = earliest
        .zip(latest)
        .map(|(earliest, latest)| DateRange { earliest, latest });

    let mut source_counts: HashMap<&str, usize> = HashMap::new();
    for record in records.iter().filter(|record| !record.source.is_empty()) {
        *source_counts.entry(record.source.as_str()).or_insert(0) += 1;
    }
    // Highest count wins; ties go to the alphabetically first source.
    let most_common_source = source_counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(source, _)| source.to_string());

    let mut tag_counts: HashMap<&str, usize> = HashMap::new();
    for tag in records.iter().flat_map(|record| record.tags.iter()) {
        *tag_counts.entry(tag).or_insert(0) += 1;
    }
    let mut most_common_tags: Vec<TagCount> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    most_common_tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    most_common_tags.truncate(TOP_TAG_LIMIT);

    ExportSummary {
        total_jobs: records.len(),
        status_breakdown,
        date_range,
        most_common_source,
        most_common_tags,
    }
}

/// Pre-export check. Issues block the export, warnings are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportValidation {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate_for_export(records: &[JobApplication]) -> ExportValidation {
    if records.is_empty() {
        return ExportValidation {
            is_valid: false,
            issues: vec!["No jobs to export".to_string()],
            warnings: Vec::new(),
        };
    }

    let missing_company = records
        .iter()
        .filter(|record| record.company.trim().is_empty())
        .count();
    let missing_title = records
        .iter()
        .filter(|record| record.job_title.trim().is_empty())
        .count();

    let mut warnings = Vec::new();
    if missing_company > 0 {
        warnings.push(format!("{missing_company} jobs missing company name"));
    }
    if missing_title > 0 {
        warnings.push(format!("{missing_title} jobs missing job title"));
    }

    ExportValidation {
        is_valid: true,
        issues: Vec::new(),
        warnings,
    }
}
