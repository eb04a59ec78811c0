//! Job entity and repository trait.
//!
//! Maps to the `jobs` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// A job opening.
///
/// Maps to the `jobs` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - title: VARCHAR(100) NOT NULL
/// - description: TEXT NOT NULL
/// - posted_on: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub posted_on: DateTime<Utc>,
}

/// A job together with how many applications it has received.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub job: Job,
    pub application_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl JobDraft {
    pub fn from_existing(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
        }
    }

    pub fn apply(mut self, patch: JobPatch) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self
    }
}

/// List filter: `title` is a case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub title: Option<String>,
}

/// Repository trait for Job data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<JobSummary>, AppError>;

    /// Newest first.
    async fn list(&self, filter: &JobFilter, page: PageRequest)
        -> Result<Page<JobSummary>, AppError>;

    async fn create(&self, draft: &JobDraft) -> Result<JobSummary, AppError>;

    async fn update(&self, id: i64, draft: &JobDraft) -> Result<JobSummary, AppError>;

    /// Deletes the job and, by cascade, its applications.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
