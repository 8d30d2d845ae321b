use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use jobdesk::portal::applications::{application_router, JobApplicationService};
use jobdesk::portal::chat::{group_by_day, validate_text, ChatMessage, DayLabel, PresenceEntry};
use jobdesk::portal::jobs::{
    exclude_own_postings, filter_jobs, matched_skills, EmploymentType, Job, JobId, JobQuery,
    JobStatus,
};
use jobdesk::portal::mail::{ApplicationEmail, Mailer};
use jobdesk::portal::matching::compatibility_score;
use jobdesk::portal::profiles::{UserId, UserKind};
use jobdesk::portal::resume::{validate_upload, ResumeParser, MAX_RESUME_BYTES};
use jobdesk::portal::store::{PortalStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::infra::{AppState, ChatRoom};

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

pub(crate) fn with_portal_routes<S, M, P>(
    service: Arc<JobApplicationService<S, M>>,
    store: Arc<S>,
    mailer: Arc<M>,
    parser: Arc<P>,
    chat: Arc<ChatRoom>,
) -> axum::Router
where
    S: PortalStore + 'static,
    M: Mailer + 'static,
    P: ResumeParser + 'static,
{
    let job_routes = axum::Router::new()
        .route(
            "/api/v1/jobs",
            axum::routing::post(post_job_endpoint::<S>).get(list_jobs_endpoint::<S>),
        )
        .route(
            "/api/v1/employers/:employer_id/jobs",
            axum::routing::get(employer_jobs_endpoint::<S>),
        )
        .with_state(store.clone());

    let profile_routes = axum::Router::new()
        .route(
            "/api/v1/profiles/:user_id/resume",
            axum::routing::post(upload_resume_endpoint::<S>),
        )
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 64 * 1024))
        .with_state(store);

    let resume_routes = axum::Router::new()
        .route(
            "/api/parse-resume",
            axum::routing::post(parse_resume_endpoint::<P>),
        )
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + 64 * 1024))
        .with_state(parser);

    let mail_routes = axum::Router::new()
        .route(
            "/api/send-application-email",
            axum::routing::post(send_application_email_endpoint::<M>),
        )
        .with_state(mailer);

    let chat_routes = axum::Router::new()
        .route(
            "/api/v1/chat/messages",
            axum::routing::post(post_chat_message_endpoint).get(grouped_chat_messages_endpoint),
        )
        .route(
            "/api/v1/chat/presence",
            axum::routing::post(presence_heartbeat_endpoint).get(presence_roster_endpoint),
        )
        .with_state(chat);

    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .merge(job_routes)
        .merge(profile_routes)
        .merge(resume_routes)
        .merge(mail_routes)
        .merge(chat_routes)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostJobRequest {
    pub(crate) employer_id: String,
    pub(crate) company_name: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) requirements: String,
    pub(crate) skills: Vec<String>,
    #[serde(default)]
    pub(crate) salary: Option<String>,
    pub(crate) location: String,
    pub(crate) employment_type: EmploymentType,
}

pub(crate) async fn post_job_endpoint<S>(
    State(store): State<Arc<S>>,
    Json(payload): Json<PostJobRequest>,
) -> impl IntoResponse
where
    S: PortalStore,
{
    let job = Job {
        id: next_job_id(),
        employer_id: UserId(payload.employer_id),
        company_name: payload.company_name,
        title: payload.title,
        description: payload.description,
        requirements: payload.requirements,
        skills: payload.skills,
        salary: payload.salary,
        location: payload.location,
        employment_type: payload.employment_type,
        posted_at: Utc::now(),
        status: JobStatus::Active,
    };

    match store.insert_job(job) {
        Ok(job) => (StatusCode::CREATED, Json(json!(job))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobListParams {
    #[serde(default)]
    pub(crate) search: String,
    #[serde(default)]
    pub(crate) location: String,
    #[serde(default)]
    pub(crate) viewer: Option<String>,
}

/// One listing row: the job itself plus, for jobseeker viewers, the
/// compatibility decoration the listing page renders as badges.
#[derive(Debug, Serialize)]
pub(crate) struct JobListingEntry {
    #[serde(flatten)]
    pub(crate) job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) compatibility_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) matched_skills: Option<Vec<String>>,
}

pub(crate) async fn list_jobs_endpoint<S>(
    State(store): State<Arc<S>>,
    Query(params): Query<JobListParams>,
) -> impl IntoResponse
where
    S: PortalStore,
{
    let jobs = match store.active_jobs() {
        Ok(jobs) => jobs,
        Err(err) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    };

    let viewer_id = params.viewer.map(UserId);
    let viewer_profile = match &viewer_id {
        Some(id) => match store.profile(id) {
            Ok(profile) => profile,
            Err(err) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
            }
        },
        None => None,
    };

    // Self-exclusion runs before the search filter, at fetch time.
    let visible = exclude_own_postings(jobs, viewer_id.as_ref());
    let query = JobQuery {
        search: params.search,
        location: params.location,
    };
    let filtered = filter_jobs(&visible, &query);

    let candidate_skills = viewer_profile
        .as_ref()
        .and_then(|profile| profile.jobseeker())
        .map(|details| details.skills.clone());

    let listing: Vec<JobListingEntry> = filtered
        .into_iter()
        .map(|job| match &candidate_skills {
            Some(skills) => {
                let matched: Vec<String> = matched_skills(&job, skills)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                let score = compatibility_score(&job.skills, skills);
                JobListingEntry {
                    job,
                    compatibility_score: Some(score),
                    matched_skills: Some(matched),
                }
            }
            None => JobListingEntry {
                job,
                compatibility_score: None,
                matched_skills: None,
            },
        })
        .collect();

    (StatusCode::OK, Json(json!(listing)))
}

/// The employer dashboard's own-postings view, unfiltered and regardless of
/// status.
pub(crate) async fn employer_jobs_endpoint<S>(
    State(store): State<Arc<S>>,
    Path(employer_id): Path<String>,
) -> impl IntoResponse
where
    S: PortalStore,
{
    match store.jobs_for_employer(&UserId(employer_id)) {
        Ok(jobs) => (StatusCode::OK, Json(json!(jobs))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

type ErrorReply = (StatusCode, Json<serde_json::Value>);

/// Pull the validated `resume` part out of a multipart body. Shared by the
/// parse endpoint and the profile upload endpoint, which enforce the same
/// PDF-and-size rules before doing anything with the bytes.
async fn read_resume_upload(mut multipart: Multipart) -> Result<Vec<u8>, ErrorReply> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("resume") {
                    continue;
                }
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((content_type, bytes.to_vec()));
                        break;
                    }
                    Err(err) => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": err.to_string() })),
                        ))
                    }
                }
            }
            Ok(None) => break,
            Err(err) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": err.to_string() })),
                ))
            }
        }
    }

    let Some((content_type, bytes)) = upload else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No file uploaded" })),
        ));
    };

    if let Err(err) = validate_upload(content_type.as_deref(), bytes.len()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        ));
    }

    Ok(bytes)
}

pub(crate) async fn parse_resume_endpoint<P>(
    State(parser): State<Arc<P>>,
    multipart: Multipart,
) -> impl IntoResponse
where
    P: ResumeParser,
{
    let bytes = match read_resume_upload(multipart).await {
        Ok(bytes) => bytes,
        Err(reply) => return reply,
    };

    match parser.parse(&bytes) {
        Ok(parsed) => (StatusCode::OK, Json(json!({ "success": true, "data": parsed }))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

/// Accept a resume PDF for a jobseeker and record its storage URL on the
/// profile. The in-memory deployment has no blob store; the URL is
/// deterministic per user and overwritten on re-upload.
pub(crate) async fn upload_resume_endpoint<S>(
    State(store): State<Arc<S>>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse
where
    S: PortalStore,
{
    if let Err(reply) = read_resume_upload(multipart).await {
        return reply;
    }

    let resume_url = format!("https://files.jobdesk.local/resumes/{user_id}.pdf");
    match store.set_resume_url(&UserId(user_id), resume_url.clone()) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "resume_url": resume_url })),
        ),
        Err(StoreError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile not found" })),
        ),
        Err(StoreError::Conflict) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "only job seekers can upload a resume" })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

pub(crate) async fn send_application_email_endpoint<M>(
    State(mailer): State<Arc<M>>,
    Json(payload): Json<ApplicationEmail>,
) -> impl IntoResponse
where
    M: Mailer,
{
    match mailer.send(payload) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Email sent successfully" })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostMessageRequest {
    pub(crate) text: String,
    pub(crate) user_id: String,
    pub(crate) username: String,
    pub(crate) user_type: UserKind,
}

pub(crate) async fn post_chat_message_endpoint(
    State(chat): State<Arc<ChatRoom>>,
    Json(payload): Json<PostMessageRequest>,
) -> impl IntoResponse {
    let text = match validate_text(&payload.text) {
        Ok(text) => text,
        Err(err) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": err.to_string() })),
            )
        }
    };

    let message = chat.append(
        text,
        UserId(payload.user_id),
        payload.username,
        payload.user_type,
        Utc::now(),
    );
    (StatusCode::CREATED, Json(json!(message)))
}

/// One rendered day bucket: its label plus the messages inside it,
/// oldest first.
#[derive(Debug, Serialize)]
pub(crate) struct DayGroup {
    pub(crate) label: DayLabel,
    pub(crate) messages: Vec<ChatMessage>,
}

/// Day labels are relative to the viewer's calendar, so clients pass their
/// local date; UTC is the fallback for callers that do not.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatFeedParams {
    #[serde(default)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) async fn grouped_chat_messages_endpoint(
    State(chat): State<Arc<ChatRoom>>,
    Query(params): Query<ChatFeedParams>,
) -> Json<Vec<DayGroup>> {
    let messages = chat.snapshot();
    let today = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let groups = group_by_day(&messages, today)
        .into_iter()
        .map(|(label, messages)| DayGroup { label, messages })
        .collect();
    Json(groups)
}

#[derive(Debug, Deserialize)]
pub(crate) struct HeartbeatRequest {
    pub(crate) user_id: String,
    pub(crate) username: String,
    pub(crate) user_type: UserKind,
}

pub(crate) async fn presence_heartbeat_endpoint(
    State(chat): State<Arc<ChatRoom>>,
    Json(payload): Json<HeartbeatRequest>,
) -> impl IntoResponse {
    chat.heartbeat(
        UserId(payload.user_id),
        payload.username,
        payload.user_type,
        Utc::now(),
    );
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub(crate) async fn presence_roster_endpoint(
    State(chat): State<Arc<ChatRoom>>,
) -> Json<Vec<PresenceEntry>> {
    Json(chat.active(Utc::now()))
}
