use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scorer::WaitlistPosition;

/// Identifier wrapper for ambassador applicants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Intake form payload submitted by a prospective ambassador.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIntake {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub ambassador_type: Option<String>,
    #[serde(default)]
    pub referred_by: Option<ApplicantId>,
}

/// Validated intake with normalized contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedIntake {
    pub full_name: String,
    pub email: String,
    pub school: Option<String>,
    pub ambassador_type: Option<String>,
    pub referred_by: Option<ApplicantId>,
}

impl ApplicantIntake {
    pub(crate) fn validate(self) -> Result<ValidatedIntake, IntakeError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(IntakeError::MissingName);
        }

        let email = normalize_email(&self.email)?;

        Ok(ValidatedIntake {
            full_name,
            email,
            school: non_blank(self.school),
            ambassador_type: non_blank(self.ambassador_type),
            referred_by: self
                .referred_by
                .filter(|referrer| !referrer.0.trim().is_empty()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn normalize_email(raw: &str) -> Result<String, IntakeError> {
    let email = raw.trim().to_ascii_lowercase();
    let mut parts = email.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        _ => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(IntakeError::InvalidEmail(raw.trim().to_string()))
    }
}

/// Intake rejections surfaced back to the signup form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("full name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Stored applicant. `waitlist_position` is derived from `points` on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub applicant_id: ApplicantId,
    pub full_name: String,
    pub email: String,
    pub school: Option<String>,
    pub ambassador_type: Option<String>,
    pub referred_by: Option<ApplicantId>,
    pub points: f64,
    pub waitlist_position: WaitlistPosition,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicantRecord {
    pub fn status_view(&self) -> ApplicantStatusView {
        ApplicantStatusView {
            applicant_id: self.applicant_id.clone(),
            full_name: self.full_name.clone(),
            school: self.school.clone(),
            points: self.points,
            waitlist_position: self.waitlist_position.get(),
            updated_at: self.updated_at,
        }
    }
}

/// Portal-facing view of an applicant; contact details stay server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantStatusView {
    pub applicant_id: ApplicantId,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub school: Option<String>,
    pub points: f64,
    pub waitlist_position: u8,
    pub updated_at: DateTime<Utc>,
}
