//! Job Service
//!
//! CRUD for job postings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{JobDraft, JobFilter, JobPatch, JobRepository, JobSummary};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait JobService: Send + Sync {
    async fn list(&self, filter: JobFilter, page: PageRequest) -> Result<Page<JobSummary>, JobError>;

    async fn get(&self, id: i64) -> Result<JobSummary, JobError>;

    async fn create(&self, draft: JobDraft) -> Result<JobSummary, JobError>;

    async fn update(&self, id: i64, patch: JobPatch) -> Result<JobSummary, JobError>;

    async fn delete(&self, id: i64) -> Result<(), JobError>;
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound => AppError::NotFound("Job not found".into()),
            JobError::Storage(e) => e,
        }
    }
}

pub struct JobServiceImpl<R: JobRepository> {
    repo: Arc<R>,
}

impl<R: JobRepository> JobServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn not_found_as_job(err: AppError) -> JobError {
    match err {
        AppError::NotFound(_) => JobError::NotFound,
        other => other.into(),
    }
}

#[async_trait]
impl<R: JobRepository + 'static> JobService for JobServiceImpl<R> {
    async fn list(&self, filter: JobFilter, page: PageRequest) -> Result<Page<JobSummary>, JobError> {
        Ok(self.repo.list(&filter, page).await?)
    }

    async fn get(&self, id: i64) -> Result<JobSummary, JobError> {
        self.repo.find_by_id(id).await?.ok_or(JobError::NotFound)
    }

    async fn create(&self, draft: JobDraft) -> Result<JobSummary, JobError> {
        let job = self.repo.create(&draft).await?;
        tracing::info!(job_id = job.job.id, "Job posted");
        Ok(job)
    }

    async fn update(&self, id: i64, patch: JobPatch) -> Result<JobSummary, JobError> {
        let existing = self.get(id).await?;
        let draft = JobDraft::from_existing(&existing.job).apply(patch);
        self.repo.update(id, &draft).await.map_err(not_found_as_job)
    }

    async fn delete(&self, id: i64) -> Result<(), JobError> {
        self.repo.delete(id).await.map_err(not_found_as_job)
    }
}
