//! Job-application tracking: records, derived status, filtering, statistics, and export.

pub mod domain;
pub mod export;
pub mod filter;
pub mod report;
pub mod repository;
pub mod store;
pub mod temporal;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationPatch, ApplicationStatus, JobApplication, NewApplication, TagSet,
    UnknownStatus,
};
pub use export::{suggested_filename, to_delimited_text, ExportError, ExportOutput};
pub use filter::{distinct_sources, distinct_tags, filter_applications, DateBucket, FilterCriteria};
pub use report::{summarize, ApplicationStatistics};
pub use repository::{ApplicationRepository, RepositoryError, StorageStats};
pub use store::{CollectionStore, FileStore, MemoryStore, StoreError, COLLECTION_KEY};
pub use temporal::{
    deadline_status, days_until, follow_up_status, is_follow_up_due, Clock, DeadlineStatus,
    FixedClock, FollowUpStatus, SystemClock, Urgency,
};
pub use validation::{parse_date_input, ValidationError, ValidationErrors};
