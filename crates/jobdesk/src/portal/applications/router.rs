use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationDecision, ApplicationId};
use super::service::{ApplicationServiceError, JobApplicationService};
use crate::portal::jobs::JobId;
use crate::portal::mail::Mailer;
use crate::portal::profiles::UserId;
use crate::portal::store::PortalStore;

/// Router builder exposing HTTP endpoints for application intake and
/// employer decisions.
pub fn application_router<S, M>(service: Arc<JobApplicationService<S, M>>) -> Router
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<S, M>))
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<S, M>),
        )
        .route(
            "/api/v1/applications/:application_id/decision",
            post(decision_handler::<S, M>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/applications",
            get(applicant_list_handler::<S, M>),
        )
        .route(
            "/api/v1/employers/:employer_id/applications",
            get(employer_list_handler::<S, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) job_id: String,
    pub(crate) applicant_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) decision: ApplicationDecision,
}

fn error_response(error: ApplicationServiceError) -> Response {
    let status = match &error {
        ApplicationServiceError::JobNotFound
        | ApplicationServiceError::ApplicantNotFound
        | ApplicationServiceError::ApplicationNotFound => StatusCode::NOT_FOUND,
        ApplicationServiceError::NotAJobseeker | ApplicationServiceError::MissingResume => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApplicationServiceError::AlreadyApplied | ApplicationServiceError::AlreadyDecided { .. } => {
            StatusCode::CONFLICT
        }
        ApplicationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S, M>(
    State(service): State<Arc<JobApplicationService<S, M>>>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    let job_id = JobId(request.job_id);
    let applicant_id = UserId(request.applicant_id);

    match service.apply(&job_id, &applicant_id) {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<S, M>(
    State(service): State<Arc<JobApplicationService<S, M>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => (StatusCode::OK, axum::Json(application.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<S, M>(
    State(service): State<Arc<JobApplicationService<S, M>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    let id = ApplicationId(application_id);
    match service.decide(&id, request.decision) {
        Ok(application) => (StatusCode::OK, axum::Json(application.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn applicant_list_handler<S, M>(
    State(service): State<Arc<JobApplicationService<S, M>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match service.for_applicant(&UserId(applicant_id)) {
        Ok(applications) => {
            let views: Vec<_> = applications.iter().map(|a| a.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn employer_list_handler<S, M>(
    State(service): State<Arc<JobApplicationService<S, M>>>,
    Path(employer_id): Path<String>,
) -> Response
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
{
    match service.for_employer(&UserId(employer_id)) {
        Ok(applications) => {
            let views: Vec<_> = applications.iter().map(|a| a.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}
