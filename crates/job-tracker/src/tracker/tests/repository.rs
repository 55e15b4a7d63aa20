use super::common::*;
use crate::tracker::domain::{
    ApplicationId, ApplicationPatch, ApplicationStatus, NewApplication, TagSet,
};
use crate::tracker::repository::RepositoryError;
use crate::tracker::store::{CollectionStore, MemoryStore, StoreError, COLLECTION_KEY};
use crate::tracker::validation::ValidationError;
use chrono::Duration;

#[test]
fn create_then_list_round_trips_input() {
    let (repository, _store, _clock) = repository();
    let input = NewApplication {
        company: "Acme Corp".to_string(),
        job_title: "Staff Engineer".to_string(),
        status: ApplicationStatus::Interview,
        source: "Referral".to_string(),
        deadline: Some(days_from_now(5)),
        follow_up_date: Some(days_from_now(2)),
        notes: "Second round on Friday".to_string(),
        resume_url: Some("https://example.com/resume.pdf".to_string()),
        tags: ["rust", "distributed"].into_iter().collect::<TagSet>(),
    };

    let created = repository.create(input.clone()).expect("create succeeds");
    let listed = repository.list().expect("list succeeds");

    assert_eq!(listed, vec![created.clone()]);
    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.company, input.company);
    assert_eq!(created.job_title, input.job_title);
    assert_eq!(created.status, input.status);
    assert_eq!(created.source, input.source);
    assert_eq!(created.deadline, input.deadline);
    assert_eq!(created.follow_up_date, input.follow_up_date);
    assert_eq!(created.notes, input.notes);
    assert_eq!(created.resume_url, input.resume_url);
    assert_eq!(created.tags, input.tags);
    assert_eq!(created.created_at, now());
    assert_eq!(created.updated_at, now());
    assert_eq!(created.date_applied, None);
}

#[test]
fn create_assigns_unique_ids_and_stamps_applied_date() {
    let (repository, _store, _clock) = repository();
    let first = repository
        .create(NewApplication {
            status: ApplicationStatus::Applied,
            ..submission("Acme", "Engineer")
        })
        .expect("first create");
    let second = repository
        .create(submission("Globex", "Engineer"))
        .expect("second create");

    assert_ne!(first.id, second.id);
    assert_eq!(first.date_applied, Some(now()));
    assert_eq!(second.date_applied, None);
}

#[test]
fn create_rejects_missing_required_fields_without_writing() {
    let (repository, store, _clock) = repository();

    match repository.create(submission("  ", "Engineer")) {
        Err(RepositoryError::Validation(errors)) => {
            assert!(errors.contains(&ValidationError::MissingCompany));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.raw(COLLECTION_KEY).is_none(), "nothing persisted");
}

#[test]
fn update_with_empty_patch_only_touches_updated_at() {
    let (repository, _store, clock) = repository();
    let created = repository
        .create(submission("Acme", "Engineer"))
        .expect("create succeeds");

    clock.advance(Duration::hours(3));
    let updated = repository
        .update(&created.id, ApplicationPatch::default())
        .expect("update succeeds");

    assert_eq!(updated.updated_at, now() + Duration::hours(3));
    let mut expected = created.clone();
    expected.updated_at = updated.updated_at;
    assert_eq!(updated, expected);
}

#[test]
fn date_applied_survives_status_round_trips() {
    let (repository, _store, clock) = repository();
    let created = repository
        .create(submission("Acme", "Engineer"))
        .expect("create succeeds");

    clock.advance(Duration::days(1));
    let applied = repository
        .update(&created.id, ApplicationPatch::status(ApplicationStatus::Applied))
        .expect("move to applied");
    let stamped = applied.date_applied.expect("date applied set");
    assert_eq!(stamped, now() + Duration::days(1));

    for status in [
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Applied,
        ApplicationStatus::Wishlist,
    ] {
        clock.advance(Duration::days(1));
        let record = repository
            .update(&created.id, ApplicationPatch::status(status))
            .expect("status change");
        assert_eq!(record.date_applied, Some(stamped));
    }
}

#[test]
fn update_unknown_id_reports_not_found_and_leaves_collection() {
    let (repository, _store, _clock) = repository();
    repository
        .create(submission("Acme", "Engineer"))
        .expect("create succeeds");
    let before = repository.list().expect("list succeeds");

    let missing = ApplicationId::from("does-not-exist");
    match repository.update(&missing, ApplicationPatch::status(ApplicationStatus::Offer)) {
        Err(RepositoryError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(repository.list().expect("list succeeds"), before);
}

#[test]
fn delete_reports_whether_anything_was_removed() {
    let (repository, _store, _clock) = repository();
    let kept = repository
        .create(submission("Acme", "Engineer"))
        .expect("create succeeds");
    let removed = repository
        .create(submission("Globex", "Engineer"))
        .expect("create succeeds");

    assert!(!repository
        .delete(&ApplicationId::from("nope"))
        .expect("delete runs"));
    assert_eq!(repository.list().expect("list").len(), 2);

    assert!(repository.delete(&removed.id).expect("delete runs"));
    assert_eq!(repository.list().expect("list"), vec![kept]);
}

#[test]
fn storage_failure_leaves_collection_unchanged() {
    let (repository, store, _clock) = repository_with(MemoryStore::with_capacity(900));
    let original = repository
        .create(submission("Acme", "Engineer"))
        .expect("first record fits");
    let snapshot = store.raw(COLLECTION_KEY);

    let oversized = NewApplication {
        notes: "x".repeat(2_000),
        ..submission("Globex", "Engineer")
    };
    match repository.create(oversized) {
        Err(RepositoryError::Storage(StoreError::CapacityExceeded { .. })) => {}
        other => panic!("expected capacity error, got {other:?}"),
    }

    let patch = ApplicationPatch {
        notes: Some("y".repeat(2_000)),
        ..ApplicationPatch::default()
    };
    assert!(matches!(
        repository.update(&original.id, patch),
        Err(RepositoryError::Storage(_))
    ));

    assert_eq!(store.raw(COLLECTION_KEY), snapshot);
    assert_eq!(repository.list().expect("list"), vec![original]);
}

#[test]
fn list_backfills_legacy_records() {
    let (repository, store, _clock) = repository();
    store
        .set(
            COLLECTION_KEY,
            r#"[
                {"company": "Legacy Co", "jobTitle": "Analyst", "deadline": "not-a-date",
                 "followUpDate": "2025-09-20", "tags": ["a", "a", " "], "resumeUrl": ""},
                {"id": "kept", "company": "Other", "status": "Ghosted",
                 "createdAt": "2025-01-01T10:00:00Z"}
            ]"#,
        )
        .expect("seed store");

    let records = repository.list().expect("list succeeds");
    assert_eq!(records.len(), 2);

    let legacy = &records[0];
    assert_eq!(legacy.id, ApplicationId::from("legacy-0000"));
    assert_eq!(legacy.status, ApplicationStatus::Wishlist);
    assert_eq!(legacy.source, "");
    assert_eq!(legacy.notes, "");
    assert_eq!(legacy.deadline, None);
    assert_eq!(
        legacy.follow_up_date.map(|date| date.date_naive().to_string()),
        Some("2025-09-20".to_string())
    );
    assert_eq!(legacy.tags.iter().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(legacy.resume_url, None);
    assert_eq!(legacy.date_applied, None);
    assert_eq!(legacy.created_at, now());

    let other = &records[1];
    assert_eq!(other.id, ApplicationId::from("kept"));
    assert_eq!(other.job_title, "");
    assert_eq!(other.status, ApplicationStatus::Wishlist);
    assert_eq!(other.updated_at, other.created_at);

    // Backfilled ids are stable, so the legacy record can be edited.
    let updated = repository
        .update(
            &ApplicationId::from("legacy-0000"),
            ApplicationPatch::status(ApplicationStatus::Applied),
        )
        .expect("legacy record is addressable");
    assert_eq!(updated.date_applied, Some(now()));
}

#[test]
fn list_assigns_unique_ids_to_missing_and_repeated_ids() {
    let (repository, store, _clock) = repository();
    store
        .set(
            COLLECTION_KEY,
            r#"[
                {"company": "No Id"},
                {"id": "dup", "company": "First"},
                {"id": "legacy-0000", "company": "Real"},
                {"id": "dup", "company": "Second"}
            ]"#,
        )
        .expect("seed store");

    let ids: Vec<String> = repository
        .list()
        .expect("list succeeds")
        .into_iter()
        .map(|record| record.id.to_string())
        .collect();
    assert_eq!(ids, vec!["legacy-0001", "dup", "legacy-0000", "legacy-0003"]);

    assert!(repository
        .delete(&ApplicationId::from("dup"))
        .expect("delete succeeds"));
    let remaining: Vec<String> = repository
        .list()
        .expect("list succeeds")
        .into_iter()
        .map(|record| record.company)
        .collect();
    assert_eq!(remaining, vec!["No Id", "Real", "Second"]);
}

#[test]
fn unreadable_collection_is_reported_not_discarded() {
    let (repository, store, _clock) = repository();
    store
        .set(COLLECTION_KEY, "{not json")
        .expect("seed store");

    assert!(matches!(repository.list(), Err(RepositoryError::Corrupt(_))));
    assert!(matches!(
        repository.create(submission("Acme", "Engineer")),
        Err(RepositoryError::Corrupt(_))
    ));
    assert_eq!(store.raw(COLLECTION_KEY).as_deref(), Some("{not json"));
}

#[test]
fn clear_and_storage_stats() {
    let (repository, _store, clock) = repository();
    repository
        .create(submission("Acme", "Engineer"))
        .expect("create succeeds");
    clock.advance(Duration::minutes(5));
    repository
        .create(submission("Globex", "Engineer"))
        .expect("create succeeds");

    let stats = repository.storage_stats().expect("stats");
    assert_eq!(stats.total, 2);
    assert!(stats.bytes_used > 0);
    assert_eq!(stats.last_updated, Some(now() + Duration::minutes(5)));

    repository.clear().expect("clear succeeds");
    assert!(repository.list().expect("list").is_empty());
    let stats = repository.storage_stats().expect("stats");
    assert_eq!(stats.bytes_used, 0);
    assert_eq!(stats.last_updated, None);
}
