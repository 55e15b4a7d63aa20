use chrono::{DateTime, Utc};
use job_tracker::tracker::export::{ExportSummary, ExportValidation};
use job_tracker::tracker::report::views::{
    ApplicationCardView, DatedApplicationView, StatisticsSummary,
};
use job_tracker::tracker::temporal::{format_display_date, relative_time};
use job_tracker::tracker::{JobApplication, StorageStats, Urgency};

const PREVIEW_LIMIT: usize = 3;

pub(crate) fn render_card(card: &ApplicationCardView, now: DateTime<Utc>) {
    let record = &card.application;
    println!("{} | {} [{}]", record.company, record.job_title, record.id);

    let mut headline = format!("  Status: {}", record.status);
    if !record.source.is_empty() {
        headline.push_str(&format!(" | Source: {}", record.source));
    }
    println!(
        "{headline} | Added {} ({})",
        format_display_date(record.created_at),
        relative_time(now, record.created_at)
    );

    if let Some(applied) = record.date_applied {
        println!("  Applied: {}", format_display_date(applied));
    }

    if let Some(deadline) = record.deadline {
        let status = &card.deadline_status;
        match status.urgency {
            Urgency::Overdue | Urgency::Today | Urgency::Urgent => println!(
                "  Deadline: {} ({}, {})",
                format_display_date(deadline),
                status.message,
                status.urgency.label()
            ),
            _ => println!(
                "  Deadline: {} ({})",
                format_display_date(deadline),
                status.message
            ),
        }
    }

    if let Some(follow_up) = record.follow_up_date {
        if card.follow_up_status.is_due {
            println!(
                "  Follow-up: {} ({})",
                format_display_date(follow_up),
                card.follow_up_status.message
            );
        } else {
            println!("  Follow-up: {}", format_display_date(follow_up));
        }
    }

    if !record.tags.is_empty() {
        println!("  Tags: {}", record.tags.join(", "));
    }
    if let Some(url) = &record.resume_url {
        println!("  Resume: {url}");
    }
    if !record.notes.is_empty() {
        println!("  Notes: {}", record.notes);
    }
}

pub(crate) fn render_list(
    cards: &[ApplicationCardView],
    total: usize,
    filtered: bool,
    now: DateTime<Utc>,
) {
    if total == 0 {
        println!("No applications yet. Add one with `job-tracker add`.");
        return;
    }
    if cards.is_empty() {
        println!("No applications match the current filters ({total} stored).");
        return;
    }

    if filtered {
        println!("Showing {} of {} applications", cards.len(), total);
    } else {
        println!("{total} applications");
    }
    for card in cards {
        println!();
        render_card(card, now);
    }
}

pub(crate) fn render_stats(summary: &StatisticsSummary) {
    println!(
        "Applications: {} total | {} in the last 30 days | {}% response rate",
        summary.total, summary.recent_activity, summary.response_rate
    );

    println!("\nStatus breakdown");
    for entry in &summary.status_breakdown {
        println!(
            "- {}: {} ({:.0}%)",
            entry.label, entry.count, entry.percentage
        );
    }

    render_dated("Upcoming deadlines (next 7 days)", &summary.upcoming_deadlines);
    render_dated("Follow-ups due", &summary.follow_ups_due);
}

fn render_dated(title: &str, entries: &[DatedApplicationView]) {
    if entries.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for entry in entries.iter().take(PREVIEW_LIMIT) {
        println!(
            "- {}, {}: {}",
            entry.company,
            entry.job_title,
            format_display_date(entry.date)
        );
    }
    if entries.len() > PREVIEW_LIMIT {
        println!("  +{} more", entries.len() - PREVIEW_LIMIT);
    }
}

pub(crate) fn render_reminders(due: &[&JobApplication], now: DateTime<Utc>) {
    if due.is_empty() {
        println!("No follow-ups due.");
        return;
    }

    let noun = if due.len() == 1 { "follow-up" } else { "follow-ups" };
    println!("{} {noun} due", due.len());
    for record in due {
        if let Some(date) = record.follow_up_date {
            println!(
                "- {}, {}: {} ({})",
                record.company,
                record.job_title,
                format_display_date(date),
                relative_time(now, date)
            );
        }
    }
}

pub(crate) fn render_facets(sources: &[String], tags: &[String]) {
    println!("Sources: {}", joined_or_none(sources));
    println!("Tags: {}", joined_or_none(tags));
}

fn joined_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}

pub(crate) fn render_export_preview(summary: &ExportSummary, validation: &ExportValidation) {
    println!("Export summary: {} applications", summary.total_jobs);
    for (status, count) in &summary.status_breakdown {
        println!("- {}: {}", status, count);
    }
    if let Some(range) = &summary.date_range {
        println!(
            "Date range: {} to {}",
            format_display_date(range.earliest),
            format_display_date(range.latest)
        );
    }
    if let Some(source) = &summary.most_common_source {
        println!("Most common source: {source}");
    }
    if !summary.most_common_tags.is_empty() {
        let tags: Vec<String> = summary
            .most_common_tags
            .iter()
            .map(|tag| format!("{} ({})", tag.tag, tag.count))
            .collect();
        println!("Top tags: {}", tags.join(", "));
    }
    render_export_warnings(validation);
}

pub(crate) fn render_export_warnings(validation: &ExportValidation) {
    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }
}

pub(crate) fn render_storage(stats: &StorageStats, now: DateTime<Utc>) {
    println!("Stored applications: {}", stats.total);
    println!("Storage used: {} bytes", stats.bytes_used);
    match stats.last_updated {
        Some(at) => println!(
            "Last updated: {} ({})",
            format_display_date(at),
            relative_time(now, at)
        ),
        None => println!("Last updated: never"),
    }
}
