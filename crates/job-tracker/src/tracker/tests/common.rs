use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::tracker::domain::{
    ApplicationId, ApplicationStatus, JobApplication, NewApplication, TagSet,
};
use crate::tracker::repository::ApplicationRepository;
use crate::tracker::store::MemoryStore;
use crate::tracker::temporal::FixedClock;

pub(super) type TestRepository = ApplicationRepository<MemoryStore, FixedClock>;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 15, 0, 0)
        .single()
        .expect("valid reference time")
}

pub(super) fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}

pub(super) fn application(id: &str, company: &str, status: ApplicationStatus) -> JobApplication {
    let created_at = days_from_now(-1);
    JobApplication {
        id: ApplicationId::from(id),
        company: company.to_string(),
        job_title: "Software Engineer".to_string(),
        status,
        source: String::new(),
        deadline: None,
        follow_up_date: None,
        date_applied: (status == ApplicationStatus::Applied).then_some(created_at),
        notes: String::new(),
        resume_url: None,
        tags: TagSet::new(),
        created_at,
        updated_at: created_at,
    }
}

pub(super) fn tagged(mut record: JobApplication, tags: &[&str]) -> JobApplication {
    record.tags = tags.iter().collect();
    record
}

/// A small, varied collection used by the filter and statistics tests.
pub(super) fn sample_collection() -> Vec<JobApplication> {
    let mut acme = tagged(
        application("acme", "Acme Corp", ApplicationStatus::Applied),
        &["rust", "remote"],
    );
    acme.source = "LinkedIn".to_string();
    acme.notes = "Referred by Dana".to_string();
    acme.deadline = Some(days_from_now(2));

    let mut globex = tagged(
        application("globex", "Globex", ApplicationStatus::Interview),
        &["go"],
    );
    globex.job_title = "Backend Developer".to_string();
    globex.source = "Indeed".to_string();
    globex.created_at = days_from_now(-45);
    globex.updated_at = globex.created_at;
    globex.follow_up_date = Some(days_from_now(-1));

    let mut initech = application("initech", "Initech", ApplicationStatus::Wishlist);
    initech.source = "linkedin".to_string();
    initech.notes = "Remote-first team".to_string();
    initech.created_at = days_from_now(-100);
    initech.updated_at = initech.created_at;
    initech.deadline = Some(days_from_now(20));

    let mut umbrella = tagged(
        application("umbrella", "Umbrella", ApplicationStatus::Applied),
        &["python", "rust"],
    );
    umbrella.created_at = days_from_now(-200);
    umbrella.date_applied = Some(days_from_now(-20));
    umbrella.follow_up_date = Some(days_from_now(0));

    vec![acme, globex, initech, umbrella]
}

pub(super) fn submission(company: &str, job_title: &str) -> NewApplication {
    NewApplication {
        company: company.to_string(),
        job_title: job_title.to_string(),
        ..NewApplication::default()
    }
}

pub(super) fn repository_with(store: MemoryStore) -> (TestRepository, Arc<MemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(store);
    let clock = Arc::new(FixedClock::new(now()));
    let repository = ApplicationRepository::new(store.clone(), clock.clone());
    (repository, store, clock)
}

pub(super) fn repository() -> (TestRepository, Arc<MemoryStore>, Arc<FixedClock>) {
    repository_with(MemoryStore::new())
}
