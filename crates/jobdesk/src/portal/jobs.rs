use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::matching::skill_matches;
use super::profiles::UserId;

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// A job posting owned by one employer and readable by everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer_id: UserId,
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub skills: Vec<String>,
    pub salary: Option<String>,
    pub location: String,
    pub employment_type: EmploymentType,
    pub posted_at: DateTime<Utc>,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
}

/// Free-text search constraints for the listing page. Empty strings mean no
/// constraint; both constraints are ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
}

/// Drop jobs posted by the viewing user. Runs at fetch time, before any
/// search filtering, so an employer never sees their own postings in the
/// listing.
pub fn exclude_own_postings(jobs: Vec<Job>, viewer: Option<&UserId>) -> Vec<Job> {
    match viewer {
        Some(viewer) => jobs
            .into_iter()
            .filter(|job| &job.employer_id != viewer)
            .collect(),
        None => jobs,
    }
}

/// Apply the search and location constraints, preserving input order. The
/// search term matches case-insensitively against title, description, or any
/// skill entry; the location term against the location field.
pub fn filter_jobs(jobs: &[Job], query: &JobQuery) -> Vec<Job> {
    let search = query.search.trim().to_lowercase();
    let location = query.location.trim().to_lowercase();

    jobs.iter()
        .filter(|job| {
            if !search.is_empty() {
                let in_title = job.title.to_lowercase().contains(&search);
                let in_description = job.description.to_lowercase().contains(&search);
                let in_skills = job
                    .skills
                    .iter()
                    .any(|skill| skill.to_lowercase().contains(&search));
                if !(in_title || in_description || in_skills) {
                    return false;
                }
            }

            if !location.is_empty() && !job.location.to_lowercase().contains(&location) {
                return false;
            }

            true
        })
        .cloned()
        .collect()
}

/// Which of the job's required skills the candidate matches, for listing
/// badges. Uses the same containment rule as the compatibility score.
pub fn matched_skills<'a>(job: &'a Job, candidate_skills: &[String]) -> Vec<&'a str> {
    job.skills
        .iter()
        .filter(|skill| {
            candidate_skills
                .iter()
                .any(|candidate| skill_matches(skill, candidate))
        })
        .map(String::as_str)
        .collect()
}
