//! End-to-end coverage of the intake flow through the public facade: job
//! search, deduplicated submission, scoring, and the employer decision.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use jobdesk::portal::applications::{ApplicationId, ApplicationStatus, JobApplication};
    use jobdesk::portal::jobs::{EmploymentType, Job, JobId, JobStatus};
    use jobdesk::portal::mail::{ApplicationEmail, MailError, Mailer};
    use jobdesk::portal::profiles::{
        JobseekerProfile, ProfileDetails, UserId, UserProfile,
    };
    use jobdesk::portal::store::{PortalStore, StoreError};

    pub fn job(id: &str, employer: &str, title: &str, location: &str, skills: &[&str]) -> Job {
        Job {
            id: JobId(id.to_string()),
            employer_id: UserId(employer.to_string()),
            company_name: "Acme".to_string(),
            title: title.to_string(),
            description: format!("{title} role"),
            requirements: "See description".to_string(),
            skills: skills.iter().map(|skill| skill.to_string()).collect(),
            salary: None,
            location: location.to_string(),
            employment_type: EmploymentType::FullTime,
            posted_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
            status: JobStatus::Active,
        }
    }

    pub fn candidate(id: &str, skills: &[&str]) -> UserProfile {
        UserProfile {
            id: UserId(id.to_string()),
            email: format!("{id}@example.com"),
            username: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
            details: ProfileDetails::Jobseeker(JobseekerProfile {
                skills: skills.iter().map(|skill| skill.to_string()).collect(),
                experience: "4 years".to_string(),
                education: "BSc".to_string(),
                resume_url: Some(format!("https://blob.example/resumes/{id}.pdf")),
            }),
        }
    }

    #[derive(Default, Clone)]
    pub struct MemoryStore {
        jobs: Arc<Mutex<HashMap<JobId, Job>>>,
        profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
        applications: Arc<Mutex<HashMap<ApplicationId, JobApplication>>>,
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
            Ok(self
                .jobs
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
        }

        fn active_jobs(&self) -> Result<Vec<Job>, StoreError> {
            let guard = self.jobs.lock().expect("store mutex poisoned");
            let mut jobs: Vec<Job> = guard
                .values()
                .filter(|job| job.status == JobStatus::Active)
                .cloned()
                .collect();
            jobs.sort_by(|a, b| a.id.0.cmp(&b.id.0));
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
            self.profiles
                .lock()
                .expect("store mutex poisoned")
                .insert(profile.id.clone(), profile);
            Ok(())
        }

        fn profile(&self, id: &UserId) -> Result<Option<UserProfile>, StoreError> {
            Ok(self
                .profiles
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
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

        fn application(
            &self,
            id: &ApplicationId,
        ) -> Result<Option<JobApplication>, StoreError> {
            Ok(self
                .applications
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
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

    #[derive(Default, Clone)]
    pub struct RecordingMailer {
        sent: Arc<Mutex<Vec<ApplicationEmail>>>,
    }

    impl RecordingMailer {
        pub fn sent(&self) -> Vec<ApplicationEmail> {
            self.sent.lock().expect("mailer mutex poisoned").clone()
        }
    }

    impl Mailer for RecordingMailer {
        fn send(&self, email: ApplicationEmail) -> Result<(), MailError> {
            self.sent.lock().expect("mailer mutex poisoned").push(email);
            Ok(())
        }
    }
}

use std::sync::Arc;

use common::{candidate, job, MemoryStore, RecordingMailer};
use jobdesk::portal::applications::{
    ApplicationDecision, ApplicationServiceError, ApplicationStatus, JobApplicationService,
};
use jobdesk::portal::jobs::{exclude_own_postings, filter_jobs, JobId, JobQuery};
use jobdesk::portal::profiles::UserId;
use jobdesk::portal::store::PortalStore;

#[test]
fn search_then_apply_then_decide() {
    let store = MemoryStore::default();
    store
        .insert_job(job("job-1", "emp-1", "Backend Engineer", "Berlin", &["Rust", "SQL"]))
        .expect("job inserts");
    store
        .insert_job(job("job-2", "emp-2", "Frontend Engineer", "Remote", &["React"]))
        .expect("job inserts");
    store
        .upsert_profile(candidate("dana", &["rust", "postgresql"]))
        .expect("profile inserts");

    // Listing pipeline: self-exclusion first, then the free-text filter.
    let listing = store.active_jobs().expect("listing loads");
    let visible = exclude_own_postings(listing, Some(&UserId("emp-2".to_string())));
    assert_eq!(visible.len(), 1, "employers never see their own postings");

    let results = filter_jobs(
        &visible,
        &JobQuery {
            search: "rust".to_string(),
            location: "berlin".to_string(),
        },
    );
    assert_eq!(results.len(), 1);
    let target = results[0].id.clone();

    let mailer = RecordingMailer::default();
    let service = JobApplicationService::new(Arc::new(store.clone()), Arc::new(mailer.clone()));

    let application = service
        .apply(&target, &UserId("dana".to_string()))
        .expect("apply succeeds");
    assert_eq!(application.compatibility_score, 100);
    assert_eq!(application.status, ApplicationStatus::Pending);

    // Second attempt from the same candidate is refused, however often.
    assert!(matches!(
        service.apply(&target, &UserId("dana".to_string())),
        Err(ApplicationServiceError::AlreadyApplied)
    ));

    let decided = service
        .decide(&application.id, ApplicationDecision::Accepted)
        .expect("decision succeeds");
    assert_eq!(decided.status, ApplicationStatus::Accepted);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].job_title, "Backend Engineer");
    assert!(sent[0].html_body().contains("100%"));
}

#[test]
fn candidate_without_overlap_scores_zero_but_can_apply() {
    let store = MemoryStore::default();
    store
        .insert_job(job(
            "job-1",
            "emp-1",
            "Platform Engineer",
            "Remote",
            &["Kubernetes", "Terraform"],
        ))
        .expect("job inserts");
    store
        .upsert_profile(candidate("eli", &["k8s", "ansible"]))
        .expect("profile inserts");

    let mailer = RecordingMailer::default();
    let service = JobApplicationService::new(Arc::new(store), Arc::new(mailer));

    let application = service
        .apply(&JobId("job-1".to_string()), &UserId("eli".to_string()))
        .expect("apply succeeds");

    // "k8s" is not a substring of "Kubernetes": the strict containment rule
    // produces a zero score, and the application still goes through.
    assert_eq!(application.compatibility_score, 0);
    assert_eq!(application.status, ApplicationStatus::Pending);
}
