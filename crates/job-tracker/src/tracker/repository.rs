use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    ApplicationId, ApplicationPatch, ApplicationStatus, JobApplication, NewApplication, TagSet,
};
use super::store::{CollectionStore, StoreError, COLLECTION_KEY};
use super::temporal::{parse_instant, Clock};
use super::validation::ValidationErrors;

/// Owner of the canonical application collection.
///
/// Every mutation is a full read-modify-write against the store; the new
/// record is only handed back once the write went through, so a rejected
/// write leaves both the stored collection and any caller-held view as they were.
pub struct ApplicationRepository<S, C> {
    store: Arc<S>,
    clock: Arc<C>,
    key: String,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("invalid application: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("job application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("stored collection is unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to serialize collection: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Size and freshness of the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total: usize,
    pub bytes_used: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<S, C> ApplicationRepository<S, C>
where
    S: CollectionStore,
    C: Clock,
{
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            key: COLLECTION_KEY.to_string(),
        }
    }

    /// Store the collection under a different key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Full collection, with fields missing from older data backfilled.
    pub fn list(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        self.load()
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self.load()?.into_iter().find(|record| &record.id == id))
    }

    pub fn create(&self, input: NewApplication) -> Result<JobApplication, RepositoryError> {
        input.validate_required()?;

        let mut records = self.load()?;
        let now = self.clock.now();

        let mut id = ApplicationId::generate();
        while records.iter().any(|record| record.id == id) {
            id = ApplicationId::generate();
        }

        let NewApplication {
            company,
            job_title,
            status,
            source,
            deadline,
            follow_up_date,
            notes,
            resume_url,
            tags,
        } = input;

        let record = JobApplication {
            id,
            company,
            job_title,
            status,
            source,
            deadline,
            follow_up_date,
            date_applied: (status == ApplicationStatus::Applied).then_some(now),
            notes,
            resume_url,
            tags,
            created_at: now,
            updated_at: now,
        };

        records.push(record.clone());
        self.persist(&records)?;

        info!(id = %record.id, company = %record.company, status = %record.status, "created job application");
        Ok(record)
    }

    pub fn update(
        &self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, RepositoryError> {
        patch.validate()?;

        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|record| &record.id == id) else {
            warn!(%id, "job application not found for update");
            return Err(RepositoryError::NotFound(id.clone()));
        };

        record.apply(patch, self.clock.now());
        let updated = record.clone();
        self.persist(&records)?;

        info!(id = %updated.id, status = %updated.status, "updated job application");
        Ok(updated)
    }

    /// Returns whether a record with `id` existed and was removed.
    pub fn delete(&self, id: &ApplicationId) -> Result<bool, RepositoryError> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| &record.id != id);

        if records.len() == before {
            warn!(%id, "job application not found for deletion");
            return Ok(false);
        }

        self.persist(&records)?;
        info!(%id, remaining = records.len(), "deleted job application");
        Ok(true)
    }

    /// Drops the whole collection.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "cleared all job applications");
        Ok(())
    }

    pub fn storage_stats(&self) -> Result<StorageStats, RepositoryError> {
        let bytes_used = self
            .store
            .get(&self.key)?
            .map(|raw| raw.len())
            .unwrap_or(0);
        let records = self.load()?;

        Ok(StorageStats {
            total: records.len(),
            bytes_used,
            last_updated: records.iter().map(|record| record.updated_at).max(),
        })
    }

    fn load(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let stored: Vec<StoredApplication> =
            serde_json::from_str(&raw).map_err(RepositoryError::Corrupt)?;
        let now = self.clock.now();
        let ids = assign_ids(&stored);
        let records: Vec<JobApplication> = stored
            .into_iter()
            .zip(ids)
            .map(|(stored, id)| stored.normalize(id, now))
            .collect();

        debug!(count = records.len(), "loaded job applications");
        Ok(records)
    }

    fn persist(&self, records: &[JobApplication]) -> Result<(), RepositoryError> {
        let payload = serde_json::to_string(records).map_err(RepositoryError::Serialization)?;
        self.store.set(&self.key, &payload).map_err(|err| {
            warn!(error = %err, "rejected write of job applications");
            RepositoryError::Storage(err)
        })
    }
}

/// Picks one id per stored record, keeping the stored id when it is present
/// and not already claimed by an earlier record. Missing or repeated ids get a
/// `legacy-NNNN` id that no stored record uses.
fn assign_ids(stored: &[StoredApplication]) -> Vec<ApplicationId> {
    let taken: HashSet<&str> = stored
        .iter()
        .filter_map(|record| record.id.as_deref())
        .collect();
    let mut claimed: HashSet<String> = HashSet::with_capacity(stored.len());

    stored
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let kept = record
                .id
                .as_deref()
                .filter(|id| !id.trim().is_empty() && !claimed.contains(*id));
            let id = match kept {
                Some(id) => id.to_string(),
                None => {
                    let mut slot = index;
                    let mut candidate = format!("legacy-{slot:04}");
                    while taken.contains(candidate.as_str()) || claimed.contains(&candidate) {
                        slot += 1;
                        candidate = format!("legacy-{slot:04}");
                    }
                    warn!(
                        id = %candidate,
                        stored = ?record.id,
                        "backfilled missing or duplicate application id"
                    );
                    candidate
                }
            };
            claimed.insert(id.clone());
            ApplicationId(id)
        })
        .collect()
}

/// Lenient mirror of the persisted shape; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredApplication {
    id: Option<String>,
    company: Option<String>,
    job_title: Option<String>,
    status: Option<String>,
    source: Option<String>,
    deadline: Option<String>,
    follow_up_date: Option<String>,
    date_applied: Option<String>,
    notes: Option<String>,
    resume_url: Option<String>,
    tags: Option<Vec<String>>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl StoredApplication {
    fn normalize(self, id: ApplicationId, now: DateTime<Utc>) -> JobApplication {
        let status = match self.status.as_deref() {
            None | Some("") => ApplicationStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!(%id, error = %err, "unknown stored status, using Wishlist");
                ApplicationStatus::default()
            }),
        };

        let created_at = self.created_at.as_deref().and_then(parse_instant);
        let updated_at = self.updated_at.as_deref().and_then(parse_instant);

        JobApplication {
            company: self.company.unwrap_or_default(),
            job_title: self.job_title.unwrap_or_default(),
            status,
            source: self.source.unwrap_or_default(),
            deadline: self.deadline.as_deref().and_then(parse_instant),
            follow_up_date: self.follow_up_date.as_deref().and_then(parse_instant),
            date_applied: self.date_applied.as_deref().and_then(parse_instant),
            notes: self.notes.unwrap_or_default(),
            resume_url: self.resume_url.filter(|url| !url.trim().is_empty()),
            tags: self.tags.map(TagSet::from).unwrap_or_default(),
            created_at: created_at.unwrap_or(now),
            updated_at: updated_at.or(created_at).unwrap_or(now),
            id,
        }
    }
}
