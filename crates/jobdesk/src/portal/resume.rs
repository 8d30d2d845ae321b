use serde::{Deserialize, Serialize};

/// Resume uploads are capped at 5 MiB and must be PDFs.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Structured data extracted from a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub contact: ResumeContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeContact {
    pub email: String,
    pub phone: String,
}

/// Narrow seam for resume extraction so the mock below can later be replaced
/// by a genuine parsing service without touching the intake flow.
pub trait ResumeParser: Send + Sync {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedResume, ResumeError>;
}

/// Placeholder parser returning a fixed payload. Real extraction is an
/// external capability the portal does not implement.
#[derive(Debug, Default, Clone)]
pub struct MockResumeParser;

impl ResumeParser for MockResumeParser {
    fn parse(&self, bytes: &[u8]) -> Result<ParsedResume, ResumeError> {
        if bytes.is_empty() {
            return Err(ResumeError::MissingFile);
        }

        Ok(ParsedResume {
            skills: ["JavaScript", "React", "Node.js", "Python", "SQL", "Git"]
                .iter()
                .map(|skill| skill.to_string())
                .collect(),
            experience: "3+ years of software development experience".to_string(),
            education: "Bachelor of Science in Computer Science".to_string(),
            contact: ResumeContact {
                email: "extracted@email.com".to_string(),
                phone: "+1234567890".to_string(),
            },
        })
    }
}

/// Synchronous upload validation, run before any external call.
pub fn validate_upload(content_type: Option<&str>, size: usize) -> Result<(), ResumeError> {
    match content_type {
        Some(content_type) if content_type == mime::APPLICATION_PDF.essence_str() => {}
        Some(found) => {
            return Err(ResumeError::NotPdf {
                found: found.to_string(),
            })
        }
        None => return Err(ResumeError::MissingFile),
    }

    if size == 0 {
        return Err(ResumeError::MissingFile);
    }
    if size > MAX_RESUME_BYTES {
        return Err(ResumeError::TooLarge { size });
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Only PDF files are allowed, got '{found}'")]
    NotPdf { found: String },
    #[error("File too large ({size} bytes, limit {MAX_RESUME_BYTES})")]
    TooLarge { size: usize },
    #[error("Failed to parse resume: {0}")]
    Unparseable(String),
}
