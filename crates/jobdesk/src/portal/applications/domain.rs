use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portal::jobs::JobId;
use crate::portal::profiles::UserId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// One candidate's application to one job.
///
/// Job title and company name are denormalized at submission time so the
/// dashboards can render without a join. At most one application may exist
/// per `(job_id, applicant_id)` pair; the store enforces it on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub employer_id: UserId,
    pub company_name: String,
    pub applicant_id: UserId,
    pub applicant_name: String,
    pub applicant_email: String,
    pub compatibility_score: u8,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub resume_url: String,
}

/// Lifecycle of an application. `Pending` is the only non-terminal state;
/// both decisions are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// Employer's decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

impl ApplicationDecision {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            ApplicationDecision::Accepted => ApplicationStatus::Accepted,
            ApplicationDecision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Sanitized representation of an application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub job_title: String,
    pub company_name: String,
    pub applicant_name: String,
    pub compatibility_score: u8,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
}

impl JobApplication {
    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            job_title: self.job_title.clone(),
            company_name: self.company_name.clone(),
            applicant_name: self.applicant_name.clone(),
            compatibility_score: self.compatibility_score,
            status: self.status.label(),
            applied_at: self.applied_at,
        }
    }
}
