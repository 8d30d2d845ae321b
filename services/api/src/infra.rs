use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use jobdesk::portal::applications::{ApplicationId, ApplicationStatus, JobApplication};
use jobdesk::portal::chat::{ChatMessage, PresenceEntry, PresenceRoster};
use jobdesk::portal::jobs::{Job, JobId, JobStatus};
use jobdesk::portal::mail::{ApplicationEmail, MailError, Mailer};
use jobdesk::portal::profiles::{ProfileDetails, UserId, UserKind, UserProfile};
use jobdesk::portal::store::{PortalStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store adapter standing in for the hosted document database. Every method
/// is a direct read or write against the in-process maps, mirroring the
/// pass-through nature of the real backend calls.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPortalStore {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, JobApplication>>>,
}

impl PortalStore for InMemoryPortalStore {
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
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == JobStatus::Active)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(jobs)
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

/// Mail adapter that logs instead of dialing a relay. The real transport is
/// an external service; the intake flow only needs send to be best-effort.
#[derive(Clone)]
pub(crate) struct LoggingMailer {
    from_address: String,
}

impl LoggingMailer {
    pub(crate) fn new(from_address: String) -> Self {
        Self { from_address }
    }
}

impl Default for LoggingMailer {
    fn default() -> Self {
        Self::new("noreply@jobdesk.local".to_string())
    }
}

impl Mailer for LoggingMailer {
    fn send(&self, email: ApplicationEmail) -> Result<(), MailError> {
        info!(
            from = %self.from_address,
            to = %email.applicant_email,
            subject = %email.subject(),
            score = email.compatibility_score,
            "application confirmation email dispatched"
        );
        Ok(())
    }
}

/// The shared chat room: an append-only message log plus the presence
/// roster, standing in for the hosted real-time database.
pub(crate) struct ChatRoom {
    messages: Mutex<Vec<ChatMessage>>,
    roster: Mutex<PresenceRoster>,
    sequence: AtomicU64,
}

impl Default for ChatRoom {
    fn default() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            roster: Mutex::new(PresenceRoster::default()),
            sequence: AtomicU64::new(1),
        }
    }
}

impl ChatRoom {
    pub(crate) fn append(
        &self,
        text: String,
        user_id: UserId,
        username: String,
        user_type: UserKind,
        timestamp: DateTime<Utc>,
    ) -> ChatMessage {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let message = ChatMessage {
            id: format!("msg-{id:06}"),
            text,
            user_id,
            username,
            user_type,
            timestamp,
        };
        self.messages
            .lock()
            .expect("chat mutex poisoned")
            .push(message.clone());
        message
    }

    /// Full snapshot of the message log, unordered; callers run the grouping
    /// transform over it.
    pub(crate) fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.lock().expect("chat mutex poisoned").clone()
    }

    pub(crate) fn heartbeat(
        &self,
        user_id: UserId,
        username: String,
        user_type: UserKind,
        now: DateTime<Utc>,
    ) {
        self.roster
            .lock()
            .expect("presence mutex poisoned")
            .heartbeat(user_id, username, user_type, now);
    }

    pub(crate) fn active(&self, now: DateTime<Utc>) -> Vec<PresenceEntry> {
        self.roster
            .lock()
            .expect("presence mutex poisoned")
            .active(now)
    }
}
