use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outbound confirmation payload for a submitted application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationEmail {
    pub applicant_email: String,
    pub applicant_name: String,
    pub job_title: String,
    pub company_name: String,
    pub compatibility_score: u8,
    pub applied_on: NaiveDate,
}

impl ApplicationEmail {
    pub fn subject(&self) -> String {
        format!("Application Confirmation - {}", self.job_title)
    }

    /// HTML body of the confirmation message. Kept as a plain template so any
    /// transport (SMTP relay, hosted mail API, test recorder) can send it
    /// unchanged.
    pub fn html_body(&self) -> String {
        format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
             <h2>Application Submitted Successfully!</h2>\
             <p>Dear {name},</p>\
             <p>Thank you for applying to the position of <strong>{title}</strong> \
             at <strong>{company}</strong>.</p>\
             <ul>\
             <li><strong>Position:</strong> {title}</li>\
             <li><strong>Company:</strong> {company}</li>\
             <li><strong>Compatibility Score:</strong> {score}%</li>\
             <li><strong>Application Date:</strong> {date}</li>\
             </ul>\
             <p>We have received your application and will review it shortly.</p>\
             <p>Best regards,<br>The Job Portal Team</p>\
             <p style=\"font-size: 12px;\">This is an automated email. \
             Please do not reply to this message.</p>\
             </div>",
            name = self.applicant_name,
            title = self.job_title,
            company = self.company_name,
            score = self.compatibility_score,
            date = self.applied_on,
        )
    }
}

/// Trait describing the outbound mail relay. Sends are best-effort: callers
/// in the intake flow log failures and carry on.
pub trait Mailer: Send + Sync {
    fn send(&self, email: ApplicationEmail) -> Result<(), MailError>;
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("mail rejected: {0}")]
    Rejected(String),
}
