//! Applicant entity and repository trait.
//!
//! Maps to the `applicants` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

pub const DUPLICATE_APPLICANT_EMAIL: &str = "applicant with this email already exists.";

/// A person applying for jobs.
///
/// Maps to the `applicants` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - email: VARCHAR(254) NOT NULL UNIQUE (stored lower-case)
/// - phone: VARCHAR(15) NULL
/// - applied_on: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Applicant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub applied_on: DateTime<Utc>,
}

/// Writable applicant fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Partial update; `phone: Some(None)` clears the phone number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
}

impl ApplicantDraft {
    /// Emails compare case-insensitively, so they are stored lower-case.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self
    }

    pub fn from_existing(applicant: &Applicant) -> Self {
        Self {
            name: applicant.name.clone(),
            email: applicant.email.clone(),
            phone: applicant.phone.clone(),
        }
    }

    pub fn apply(mut self, patch: ApplicantPatch) -> Self {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        self
    }
}

/// List filter: `search` matches name or email, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantFilter {
    pub search: Option<String>,
}

/// Repository trait for Applicant data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Applicant>, AppError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &ApplicantFilter,
        page: PageRequest,
    ) -> Result<Page<Applicant>, AppError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, draft: &ApplicantDraft) -> Result<Applicant, AppError>;

    /// Fails with `NotFound` for an unknown id, `Conflict` for a taken email.
    async fn update(&self, id: i64, draft: &ApplicantDraft) -> Result<Applicant, AppError>;

    /// Deletes the applicant and, by cascade, their applications.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Whether another applicant (other than `except_id`) uses this email.
    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_lowercases_email() {
        let draft = ApplicantDraft {
            name: "Ann".into(),
            email: "  Ann@Example.COM ".into(),
            phone: None,
        }
        .normalized();
        assert_eq!(draft.email, "ann@example.com");
    }

    #[test]
    fn patch_can_clear_phone() {
        let draft = ApplicantDraft {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: Some("555".into()),
        };

        let patched = draft.apply(ApplicantPatch {
            phone: Some(None),
            ..Default::default()
        });

        assert_eq!(patched.phone, None);
        assert_eq!(patched.name, "Ann");
    }
}
