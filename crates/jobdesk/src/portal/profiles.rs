use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered portal users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// The two account roles the portal distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Jobseeker,
    Employer,
}

impl UserKind {
    pub const fn label(self) -> &'static str {
        match self {
            UserKind::Jobseeker => "jobseeker",
            UserKind::Employer => "employer",
        }
    }
}

/// Identity envelope shared by both account roles. The role-specific shape
/// lives in [`ProfileDetails`], keyed by `userType` on the wire so a jobseeker
/// record can never carry employer fields and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

/// Role-specific profile payload, tagged by user type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "userType", content = "profile", rename_all = "lowercase")]
pub enum ProfileDetails {
    Jobseeker(JobseekerProfile),
    Employer(EmployerProfile),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobseekerProfile {
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub company_name: String,
    pub company_description: String,
    pub website: String,
}

impl UserProfile {
    /// Fresh profile created at registration, with the empty shape for the
    /// chosen role.
    pub fn register(
        id: UserId,
        email: String,
        username: String,
        kind: UserKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        let details = match kind {
            UserKind::Jobseeker => ProfileDetails::Jobseeker(JobseekerProfile::default()),
            UserKind::Employer => ProfileDetails::Employer(EmployerProfile::default()),
        };

        Self {
            id,
            email,
            username,
            created_at,
            details,
        }
    }

    pub fn kind(&self) -> UserKind {
        match self.details {
            ProfileDetails::Jobseeker(_) => UserKind::Jobseeker,
            ProfileDetails::Employer(_) => UserKind::Employer,
        }
    }

    pub fn jobseeker(&self) -> Option<&JobseekerProfile> {
        match &self.details {
            ProfileDetails::Jobseeker(profile) => Some(profile),
            ProfileDetails::Employer(_) => None,
        }
    }

    pub fn employer(&self) -> Option<&EmployerProfile> {
        match &self.details {
            ProfileDetails::Employer(profile) => Some(profile),
            ProfileDetails::Jobseeker(_) => None,
        }
    }
}
