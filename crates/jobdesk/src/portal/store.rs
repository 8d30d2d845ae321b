use super::applications::{ApplicationId, ApplicationStatus, JobApplication};
use super::jobs::{Job, JobId};
use super::profiles::{UserId, UserProfile};

/// Typed facade over the external document store's per-collection operations.
///
/// The portal itself holds no state; every call is a pass-through to whatever
/// backend implements this trait. `insert_application` is a conditional
/// write: the store must refuse a second application for the same
/// `(job_id, applicant_id)` pair with [`StoreError::Conflict`], which is what
/// closes the check-then-act race in the intake flow.
pub trait PortalStore: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn active_jobs(&self) -> Result<Vec<Job>, StoreError>;
    fn jobs_for_employer(&self, employer_id: &UserId) -> Result<Vec<Job>, StoreError>;

    fn upsert_profile(&self, profile: UserProfile) -> Result<(), StoreError>;
    fn profile(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError>;
    fn set_resume_url(&self, id: &UserId, resume_url: String) -> Result<(), StoreError>;

    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, StoreError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, StoreError>;
    fn application_for(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<JobApplication>, StoreError>;
    fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError>;
    fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError>;
    fn applications_for_employer(
        &self,
        employer_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
