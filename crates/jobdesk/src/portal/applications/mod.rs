//! Application intake: deduplicated submission, compatibility scoring, and
//! employer decisions.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationDecision, ApplicationId, ApplicationStatus, ApplicationView, JobApplication,
};
pub use router::application_router;
pub use service::{ApplicationServiceError, JobApplicationService};
