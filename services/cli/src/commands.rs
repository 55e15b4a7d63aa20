use crate::cli::{AddArgs, ClearArgs, ExportArgs, IdArgs, ListArgs, StatsArgs, UpdateArgs};
use crate::infra::{typed_date, Repository};
use crate::render;
use job_tracker::error::AppError;
use job_tracker::tracker::export::{summarize_export, validate_for_export};
use job_tracker::tracker::report::views::ApplicationCardView;
use job_tracker::tracker::{
    distinct_sources, distinct_tags, filter_applications, is_follow_up_due, suggested_filename,
    summarize, to_delimited_text, ApplicationId, ApplicationPatch, CollectionStore, ExportOutput,
    JobApplication, NewApplication, RepositoryError, ValidationErrors,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub(crate) fn add<S: CollectionStore>(
    repository: &Repository<S>,
    args: AddArgs,
) -> Result<(), AppError> {
    let now = repository.now();
    let mut errors = Vec::new();
    let deadline = typed_date("deadline", args.deadline.as_deref(), &mut errors);
    let follow_up_date = typed_date("follow-up date", args.follow_up.as_deref(), &mut errors);

    let input = NewApplication {
        company: args.company,
        job_title: args.job_title,
        status: args.status.unwrap_or_default(),
        source: args.source.unwrap_or_default(),
        deadline,
        follow_up_date,
        notes: args.notes.unwrap_or_default(),
        resume_url: args.resume_url,
        tags: args.tags.iter().collect(),
    }
    .sanitized();

    if let Err(ValidationErrors(found)) = input.validate_entry(now) {
        errors.extend(found);
    }
    if !errors.is_empty() {
        return Err(ValidationErrors(errors).into());
    }

    let created = repository.create(input)?;
    println!("Added application {}", created.id);
    render::render_card(&ApplicationCardView::new(&created, now), now);
    Ok(())
}

pub(crate) fn list<S: CollectionStore>(
    repository: &Repository<S>,
    args: ListArgs,
) -> Result<(), AppError> {
    let records = repository.list()?;
    let now = repository.now();
    let criteria = args.filters.criteria();

    let cards: Vec<ApplicationCardView> = filter_applications(&records, &criteria, now)
        .iter()
        .map(|record| ApplicationCardView::new(record, now))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        render::render_list(&cards, records.len(), criteria.is_active(), now);
    }
    Ok(())
}

pub(crate) fn show<S: CollectionStore>(
    repository: &Repository<S>,
    args: IdArgs,
) -> Result<(), AppError> {
    let record = find(repository, &args.id)?;
    let now = repository.now();
    render::render_card(&ApplicationCardView::new(&record, now), now);
    Ok(())
}

pub(crate) fn update<S: CollectionStore>(
    repository: &Repository<S>,
    args: UpdateArgs,
) -> Result<(), AppError> {
    let now = repository.now();
    let id = ApplicationId::from(args.id.as_str());
    let mut errors = Vec::new();

    let deadline = if args.clear_deadline {
        Some(None)
    } else {
        args.deadline
            .as_deref()
            .map(|raw| typed_date("deadline", Some(raw), &mut errors))
    };
    let follow_up_date = if args.clear_follow_up {
        Some(None)
    } else {
        args.follow_up
            .as_deref()
            .map(|raw| typed_date("follow-up date", Some(raw), &mut errors))
    };
    let resume_url = if args.clear_resume_url {
        Some(None)
    } else {
        args.resume_url.map(Some)
    };

    let tags = if args.add_tags.is_empty() && args.remove_tags.is_empty() {
        None
    } else {
        let mut tags = find(repository, id.as_str())?.tags;
        for tag in &args.add_tags {
            tags.insert(tag);
        }
        for tag in &args.remove_tags {
            tags.remove(tag.trim());
        }
        Some(tags)
    };

    let patch = ApplicationPatch {
        company: args.company,
        job_title: args.job_title,
        status: args.status,
        source: args.source,
        deadline,
        follow_up_date,
        notes: args.notes,
        resume_url,
        tags,
    }
    .sanitized();

    if patch.is_empty() && errors.is_empty() {
        return Err(AppError::Usage(
            "nothing to update; pass at least one field to change".to_string(),
        ));
    }
    if let Err(ValidationErrors(found)) = patch.validate_entry(now) {
        errors.extend(found);
    }
    if !errors.is_empty() {
        return Err(ValidationErrors(errors).into());
    }

    let updated = repository.update(&id, patch)?;
    println!("Updated application {}", updated.id);
    render::render_card(&ApplicationCardView::new(&updated, now), now);
    Ok(())
}

pub(crate) fn delete<S: CollectionStore>(
    repository: &Repository<S>,
    args: IdArgs,
) -> Result<(), AppError> {
    let id = ApplicationId::from(args.id.as_str());
    if !repository.delete(&id)? {
        return Err(RepositoryError::NotFound(id).into());
    }
    println!("Deleted application {id}");
    Ok(())
}

pub(crate) fn stats<S: CollectionStore>(
    repository: &Repository<S>,
    args: StatsArgs,
) -> Result<(), AppError> {
    let records = repository.list()?;
    let summary = summarize(&records, repository.now()).summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render::render_stats(&summary);
    }
    Ok(())
}

pub(crate) fn reminders<S: CollectionStore>(repository: &Repository<S>) -> Result<(), AppError> {
    let records = repository.list()?;
    let now = repository.now();

    let mut due: Vec<&JobApplication> = records
        .iter()
        .filter(|record| is_follow_up_due(now, record.follow_up_date))
        .collect();
    due.sort_by_key(|record| record.follow_up_date);

    render::render_reminders(&due, now);
    Ok(())
}

pub(crate) fn facets<S: CollectionStore>(repository: &Repository<S>) -> Result<(), AppError> {
    let records = repository.list()?;
    render::render_facets(&distinct_sources(&records), &distinct_tags(&records));
    Ok(())
}

pub(crate) fn export<S: CollectionStore>(
    repository: &Repository<S>,
    args: ExportArgs,
) -> Result<(), AppError> {
    let records = repository.list()?;
    let now = repository.now();
    let selected = filter_applications(&records, &args.filters.criteria(), now);

    let body = match to_delimited_text(&selected, now)? {
        ExportOutput::Csv(body) => body,
        empty @ ExportOutput::NoData => {
            println!("{}", empty.as_text());
            return Ok(());
        }
    };
    let validation = validate_for_export(&selected);

    if args.stdout {
        render::render_export_warnings(&validation);
        println!("{body}");
        return Ok(());
    }

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(suggested_filename(now.date_naive())));
    fs::write(&path, body.as_bytes())?;

    render::render_export_preview(&summarize_export(&selected), &validation);
    println!("Exported {} applications to {}", selected.len(), path.display());
    info!(rows = selected.len(), path = %path.display(), "wrote CSV export");
    Ok(())
}

pub(crate) fn storage<S: CollectionStore>(repository: &Repository<S>) -> Result<(), AppError> {
    let stats = repository.storage_stats()?;
    render::render_storage(&stats, repository.now());
    Ok(())
}

pub(crate) fn clear<S: CollectionStore>(
    repository: &Repository<S>,
    args: ClearArgs,
) -> Result<(), AppError> {
    if !args.yes {
        return Err(AppError::Usage(
            "refusing to remove all applications without --yes".to_string(),
        ));
    }
    repository.clear()?;
    println!("Removed all stored applications");
    Ok(())
}

fn find<S: CollectionStore>(
    repository: &Repository<S>,
    raw_id: &str,
) -> Result<JobApplication, AppError> {
    let id = ApplicationId::from(raw_id);
    match repository.get(&id)? {
        Some(record) => Ok(record),
        None => Err(RepositoryError::NotFound(id).into()),
    }
}
