use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{ApplicationDecision, ApplicationId, ApplicationStatus, JobApplication};
use crate::portal::jobs::JobId;
use crate::portal::mail::{ApplicationEmail, Mailer};
use crate::portal::matching::compatibility_score;
use crate::portal::profiles::UserId;
use crate::portal::store::{PortalStore, StoreError};

/// Service composing the store, scorer, and mail relay for application
/// intake and employer decisions.
pub struct JobApplicationService<S, M> {
    store: Arc<S>,
    mailer: Arc<M>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

impl<S, M> JobApplicationService<S, M>
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    pub fn new(store: Arc<S>, mailer: Arc<M>) -> Self {
        Self { store, mailer }
    }

    /// Submit an application for `job_id` on behalf of `applicant_id`.
    ///
    /// The duplicate pre-check gives a friendly error without attempting the
    /// write; the insert itself is conditional on the `(job, applicant)` pair
    /// being free, so a concurrent submission racing past the pre-check still
    /// loses with [`ApplicationServiceError::AlreadyApplied`].
    ///
    /// The confirmation email is best-effort: a mail failure is logged and
    /// the stored application stands.
    pub fn apply(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<JobApplication, ApplicationServiceError> {
        let job = self
            .store
            .job(job_id)?
            .ok_or(ApplicationServiceError::JobNotFound)?;
        let applicant = self
            .store
            .profile(applicant_id)?
            .ok_or(ApplicationServiceError::ApplicantNotFound)?;

        let seeker = applicant
            .jobseeker()
            .ok_or(ApplicationServiceError::NotAJobseeker)?;
        let resume_url = seeker
            .resume_url
            .clone()
            .ok_or(ApplicationServiceError::MissingResume)?;

        if self.store.application_for(job_id, applicant_id)?.is_some() {
            return Err(ApplicationServiceError::AlreadyApplied);
        }

        let score = compatibility_score(&job.skills, &seeker.skills);
        let applied_at = Utc::now();

        let application = JobApplication {
            id: next_application_id(),
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            employer_id: job.employer_id.clone(),
            company_name: job.company_name.clone(),
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.username.clone(),
            applicant_email: applicant.email.clone(),
            compatibility_score: score,
            status: ApplicationStatus::Pending,
            applied_at,
            resume_url,
        };

        let stored = match self.store.insert_application(application) {
            Ok(stored) => stored,
            Err(StoreError::Conflict) => return Err(ApplicationServiceError::AlreadyApplied),
            Err(other) => return Err(other.into()),
        };

        let email = ApplicationEmail {
            applicant_email: stored.applicant_email.clone(),
            applicant_name: stored.applicant_name.clone(),
            job_title: stored.job_title.clone(),
            company_name: stored.company_name.clone(),
            compatibility_score: stored.compatibility_score,
            applied_on: applied_at.date_naive(),
        };
        if let Err(err) = self.mailer.send(email) {
            warn!(
                application_id = %stored.id.0,
                error = %err,
                "confirmation email failed, application kept"
            );
        }

        Ok(stored)
    }

    /// Record the employer's decision. Only pending applications can move;
    /// both decisions are terminal.
    pub fn decide(
        &self,
        application_id: &ApplicationId,
        decision: ApplicationDecision,
    ) -> Result<JobApplication, ApplicationServiceError> {
        let mut application = self
            .store
            .application(application_id)?
            .ok_or(ApplicationServiceError::ApplicationNotFound)?;

        if application.status.is_terminal() {
            return Err(ApplicationServiceError::AlreadyDecided {
                status: application.status.label(),
            });
        }

        let status = decision.status();
        self.store.update_application_status(application_id, status)?;
        application.status = status;
        Ok(application)
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<JobApplication, ApplicationServiceError> {
        self.store
            .application(application_id)?
            .ok_or(ApplicationServiceError::ApplicationNotFound)
    }

    pub fn for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<JobApplication>, ApplicationServiceError> {
        Ok(self.store.applications_for_applicant(applicant_id)?)
    }

    pub fn for_employer(
        &self,
        employer_id: &UserId,
    ) -> Result<Vec<JobApplication>, ApplicationServiceError> {
        Ok(self.store.applications_for_employer(employer_id)?)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job not found")]
    JobNotFound,
    #[error("applicant profile not found")]
    ApplicantNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("only job seekers can apply for jobs")]
    NotAJobseeker,
    #[error("upload a resume before applying")]
    MissingResume,
    #[error("you have already applied for this job")]
    AlreadyApplied,
    #[error("application already {status}")]
    AlreadyDecided { status: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}
