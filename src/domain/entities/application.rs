//! Application entity and repository trait.
//!
//! Maps to the `applications` table. An applicant can apply to a given job
//! at most once (`UNIQUE (applicant_id, job_id)`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Applicant, JobSummary};
use crate::domain::value_objects::ApplicationStatus;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// Conflict message for a second application to the same job.
pub const DUPLICATE_APPLICATION: &str = "You have already applied for this job.";

/// An applicant's application for a job.
///
/// Maps to the `applications` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - applicant_id: BIGINT NOT NULL REFERENCES applicants(id) ON DELETE CASCADE
/// - job_id: BIGINT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE
/// - status: VARCHAR(20) NOT NULL DEFAULT 'applied'
/// - applied_on: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: i64,
    pub applicant_id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
    pub applied_on: DateTime<Utc>,
}

/// An application joined with its applicant and job.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetails {
    pub application: Application,
    pub applicant: Applicant,
    pub job: JobSummary,
}

/// Writable application fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub applicant_id: i64,
    pub job_id: i64,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub applicant_id: Option<i64>,
    pub job_id: Option<i64>,
    pub status: Option<ApplicationStatus>,
}

impl ApplicationDraft {
    pub fn from_existing(application: &Application) -> Self {
        Self {
            applicant_id: application.applicant_id,
            job_id: application.job_id,
            status: application.status,
        }
    }

    pub fn apply(self, patch: ApplicationPatch) -> Self {
        Self {
            applicant_id: patch.applicant_id.unwrap_or(self.applicant_id),
            job_id: patch.job_id.unwrap_or(self.job_id),
            status: patch.status.unwrap_or(self.status),
        }
    }

    /// Whether this draft points at a different (applicant, job) pair.
    pub fn changes_pair(&self, existing: &Application) -> bool {
        self.applicant_id != existing.applicant_id || self.job_id != existing.job_id
    }
}

/// Exact-match list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub applicant_id: Option<i64>,
    pub job_id: Option<i64>,
}

/// Repository trait for Application data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationDetails>, AppError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetails>, AppError>;

    /// Whether the pair already has an application.
    async fn exists_for(&self, applicant_id: i64, job_id: i64) -> Result<bool, AppError>;

    /// Fails with `Conflict` when the pair already exists.
    async fn create(&self, draft: &ApplicationDraft) -> Result<Application, AppError>;

    /// Fails with `NotFound` for an unknown id, `Conflict` for a taken pair.
    async fn update(&self, id: i64, draft: &ApplicationDraft) -> Result<Application, AppError>;

    /// `None` when no application has this id.
    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
