//! Job Repository Implementation
//!
//! PostgreSQL implementation of the JobRepository trait. Every read carries
//! the job's application count.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::contains_pattern;
use crate::domain::{Job, JobDraft, JobFilter, JobRepository, JobSummary};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    title: String,
    description: String,
    posted_on: DateTime<Utc>,
    application_count: i64,
}

impl JobRow {
    fn into_summary(self) -> JobSummary {
        JobSummary {
            job: Job {
                id: self.id,
                title: self.title,
                description: self.description,
                posted_on: self.posted_on,
            },
            application_count: self.application_count,
        }
    }
}

/// PostgreSQL job repository implementation.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<JobSummary>, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT j.id, j.title, j.description, j.posted_on,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
            FROM jobs j
            WHERE j.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(JobRow::into_summary))
    }

    async fn list(
        &self,
        filter: &JobFilter,
        page: PageRequest,
    ) -> Result<Page<JobSummary>, AppError> {
        let pattern = filter.title.as_deref().map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs WHERE ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT j.id, j.title, j.description, j.posted_on,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
            FROM jobs j
            WHERE ($1::text IS NULL OR j.title ILIKE $1)
            ORDER BY j.posted_on DESC, j.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(JobRow::into_summary).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, draft: &JobDraft) -> Result<JobSummary, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, posted_on, 0::bigint AS application_count
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_summary())
    }

    async fn update(&self, id: i64, draft: &JobDraft) -> Result<JobSummary, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            WITH updated AS (
                UPDATE jobs SET title = $2, description = $3
                WHERE id = $1
                RETURNING id, title, description, posted_on
            )
            SELECT u.id, u.title, u.description, u.posted_on,
                   (SELECT COUNT(*) FROM applications a WHERE a.job_id = u.id) AS application_count
            FROM updated u
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job with id {} not found", id)))?;

        Ok(row.into_summary())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job with id {} not found", id)));
        }

        Ok(())
    }
}
