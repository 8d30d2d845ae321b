use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::portal::applications::domain::{ApplicationId, ApplicationStatus, JobApplication};
use crate::portal::applications::{application_router, JobApplicationService};
use crate::portal::jobs::{EmploymentType, Job, JobId, JobStatus};
use crate::portal::mail::{ApplicationEmail, MailError, Mailer};
use crate::portal::profiles::{
    JobseekerProfile, ProfileDetails, UserId, UserKind, UserProfile,
};
use crate::portal::store::{PortalStore, StoreError};

pub(super) fn sample_job() -> Job {
    Job {
        id: JobId("job-1".to_string()),
        employer_id: UserId("emp-1".to_string()),
        company_name: "Acme".to_string(),
        title: "Backend Engineer".to_string(),
        description: "Own the intake pipeline".to_string(),
        requirements: "3+ years backend experience".to_string(),
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        salary: Some("90k".to_string()),
        location: "Berlin".to_string(),
        employment_type: EmploymentType::FullTime,
        posted_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        status: JobStatus::Active,
    }
}

pub(super) fn jobseeker_with_resume() -> UserProfile {
    UserProfile {
        id: UserId("seeker-1".to_string()),
        email: "dana@example.com".to_string(),
        username: "dana".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
        details: ProfileDetails::Jobseeker(JobseekerProfile {
            skills: vec!["rust".to_string(), "postgresql".to_string()],
            experience: "4 years".to_string(),
            education: "BSc".to_string(),
            resume_url: Some("https://blob.example/resumes/dana.pdf".to_string()),
        }),
    }
}

pub(super) fn jobseeker_without_resume() -> UserProfile {
    let mut profile = jobseeker_with_resume();
    profile.id = UserId("seeker-2".to_string());
    if let ProfileDetails::Jobseeker(details) = &mut profile.details {
        details.resume_url = None;
    }
    profile
}

pub(super) fn employer_profile() -> UserProfile {
    UserProfile::register(
        UserId("emp-1".to_string()),
        "hr@acme.example".to_string(),
        "acme-hr".to_string(),
        UserKind::Employer,
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, JobApplication>>>,
}

impl MemoryStore {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        store.insert_job(sample_job()).expect("job inserts");
        store
            .upsert_profile(jobseeker_with_resume())
            .expect("profile inserts");
        store
            .upsert_profile(jobseeker_without_resume())
            .expect("profile inserts");
        store
            .upsert_profile(employer_profile())
            .expect("profile inserts");
        store
    }

    pub(super) fn stored_applications(&self) -> Vec<JobApplication> {
        self.applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl PortalStore for MemoryStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("store mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| job.status == JobStatus::Active)
            .cloned()
            .collect())
    }

    fn jobs_for_employer(&self, employer_id: &UserId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| &job.employer_id == employer_id)
            .cloned()
            .collect())
    }

    fn upsert_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut guard = self.profiles.lock().expect("store mutex poisoned");
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn profile(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let guard = self.profiles.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn set_resume_url(&self, id: &UserId, resume_url: String) -> Result<(), StoreError> {
        let mut guard = self.profiles.lock().expect("store mutex poisoned");
        let profile = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        match &mut profile.details {
            ProfileDetails::Jobseeker(details) => {
                details.resume_url = Some(resume_url);
                Ok(())
            }
            ProfileDetails::Employer(_) => Err(StoreError::Conflict),
        }
    }

    fn insert_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, StoreError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn application_for(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                &application.job_id == job_id && &application.applicant_id == applicant_id
            })
            .cloned())
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        let application = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        application.status = status;
        Ok(())
    }

    fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.applicant_id == applicant_id)
            .cloned()
            .collect())
    }

    fn applications_for_employer(
        &self,
        employer_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let guard = self.applications.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.employer_id == employer_id)
            .cloned()
            .collect())
    }
}

/// Store that races past the service's pre-check: lookups report no existing
/// application but the conditional insert still refuses the pair.
pub(super) struct RacingStore {
    inner: MemoryStore,
}

impl RacingStore {
    pub(super) fn seeded() -> Self {
        Self {
            inner: MemoryStore::seeded(),
        }
    }
}

impl PortalStore for RacingStore {
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        self.inner.insert_job(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.inner.job(id)
    }

    fn active_jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.inner.active_jobs()
    }

    fn jobs_for_employer(&self, employer_id: &UserId) -> Result<Vec<Job>, StoreError> {
        self.inner.jobs_for_employer(employer_id)
    }

    fn upsert_profile(&self, profile: UserProfile) -> Result<(), StoreError> {
        self.inner.upsert_profile(profile)
    }

    fn profile(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        self.inner.profile(id)
    }

    fn set_resume_url(&self, id: &UserId, resume_url: String) -> Result<(), StoreError> {
        self.inner.set_resume_url(id, resume_url)
    }

    fn insert_application(
        &self,
        _application: JobApplication,
    ) -> Result<JobApplication, StoreError> {
        Err(StoreError::Conflict)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<JobApplication>, StoreError> {
        self.inner.application(id)
    }

    fn application_for(
        &self,
        _job_id: &JobId,
        _applicant_id: &UserId,
    ) -> Result<Option<JobApplication>, StoreError> {
        Ok(None)
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), StoreError> {
        self.inner.update_application_status(id, status)
    }

    fn applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError> {
        self.inner.applications_for_applicant(applicant_id)
    }

    fn applications_for_employer(
        &self,
        employer_id: &UserId,
    ) -> Result<Vec<JobApplication>, StoreError> {
        self.inner.applications_for_employer(employer_id)
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<ApplicationEmail>>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<ApplicationEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: ApplicationEmail) -> Result<(), MailError> {
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _email: ApplicationEmail) -> Result<(), MailError> {
        Err(MailError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<JobApplicationService<MemoryStore, RecordingMailer>>,
    MemoryStore,
    RecordingMailer,
) {
    let store = MemoryStore::seeded();
    let mailer = RecordingMailer::default();
    let service = Arc::new(JobApplicationService::new(
        Arc::new(store.clone()),
        Arc::new(mailer.clone()),
    ));
    (service, store, mailer)
}

pub(super) fn router_with_service(
    service: Arc<JobApplicationService<MemoryStore, RecordingMailer>>,
) -> axum::Router {
    application_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
