//! Compatibility scoring between a job's required skills and a candidate's
//! listed skills.
//!
//! The rule is deliberately simple: two skills match when one is a
//! case-insensitive substring of the other, in either direction. "Java"
//! matches "JavaScript", and "go" matches "golang", but "k8s" does not match
//! "Kubernetes". Synonym or fuzzy matching is a product decision that has not
//! been made, so the heuristic stays as-is.

/// True when one skill contains the other, ignoring case.
pub fn skill_matches(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Percentage of job skills matched by at least one candidate skill, rounded
/// half-up to the nearest integer. Returns 0 when either list is empty.
///
/// Duplicate job skills each count toward the total and may each be matched
/// by the same candidate skill.
pub fn compatibility_score(job_skills: &[String], candidate_skills: &[String]) -> u8 {
    if job_skills.is_empty() || candidate_skills.is_empty() {
        return 0;
    }

    let matched = job_skills
        .iter()
        .filter(|job_skill| {
            candidate_skills
                .iter()
                .any(|candidate_skill| skill_matches(job_skill, candidate_skill))
        })
        .count();

    let ratio = matched as f64 / job_skills.len() as f64;
    (ratio * 100.0).round() as u8
}
