//! Application Repository Implementation
//!
//! PostgreSQL implementation of the ApplicationRepository trait. Reads join
//! the applicant and job so responses can nest both.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Applicant, Application, ApplicationDetails, ApplicationDraft, ApplicationFilter,
    ApplicationRepository, ApplicationStatus, Job, JobSummary, DUPLICATE_APPLICATION,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

const DETAILS_SELECT: &str = r#"
    SELECT a.id, a.applicant_id, a.job_id, a.status, a.applied_on,
           p.name AS applicant_name, p.email AS applicant_email,
           p.phone AS applicant_phone, p.applied_on AS applicant_applied_on,
           j.title AS job_title, j.description AS job_description,
           j.posted_on AS job_posted_on,
           (SELECT COUNT(*) FROM applications x WHERE x.job_id = j.id) AS job_application_count
    FROM applications a
    JOIN applicants p ON p.id = a.applicant_id
    JOIN jobs j ON j.id = a.job_id
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::text IS NULL OR a.status = $1)
      AND ($2::bigint IS NULL OR a.applicant_id = $2)
      AND ($3::bigint IS NULL OR a.job_id = $3)
"#;

fn parse_status(raw: &str) -> Result<ApplicationStatus, AppError> {
    raw.parse()
        .map_err(|_| AppError::Internal(format!("Unknown application status in database: {}", raw)))
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    applicant_id: i64,
    job_id: i64,
    status: String,
    applied_on: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_application(self) -> Result<Application, AppError> {
        Ok(Application {
            id: self.id,
            applicant_id: self.applicant_id,
            job_id: self.job_id,
            status: parse_status(&self.status)?,
            applied_on: self.applied_on,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DetailsRow {
    id: i64,
    applicant_id: i64,
    job_id: i64,
    status: String,
    applied_on: DateTime<Utc>,
    applicant_name: String,
    applicant_email: String,
    applicant_phone: Option<String>,
    applicant_applied_on: DateTime<Utc>,
    job_title: String,
    job_description: String,
    job_posted_on: DateTime<Utc>,
    job_application_count: i64,
}

impl DetailsRow {
    fn into_details(self) -> Result<ApplicationDetails, AppError> {
        Ok(ApplicationDetails {
            application: Application {
                id: self.id,
                applicant_id: self.applicant_id,
                job_id: self.job_id,
                status: parse_status(&self.status)?,
                applied_on: self.applied_on,
            },
            applicant: Applicant {
                id: self.applicant_id,
                name: self.applicant_name,
                email: self.applicant_email,
                phone: self.applicant_phone,
                applied_on: self.applicant_applied_on,
            },
            job: JobSummary {
                job: Job {
                    id: self.job_id,
                    title: self.job_title,
                    description: self.job_description,
                    posted_on: self.job_posted_on,
                },
                application_count: self.job_application_count,
            },
        })
    }
}

/// PostgreSQL application repository implementation.
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ApplicationDetails>, AppError> {
        let sql = format!("{} WHERE a.id = $1", DETAILS_SELECT);
        let row = sqlx::query_as::<_, DetailsRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(DetailsRow::into_details).transpose()
    }

    async fn list(
        &self,
        filter: &ApplicationFilter,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetails>, AppError> {
        let status = filter.status.map(|s| s.as_str());

        let count_sql = format!("SELECT COUNT(*) FROM applications a {}", FILTER_CLAUSE);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(status)
            .bind(filter.applicant_id)
            .bind(filter.job_id)
            .fetch_one(&self.pool)
            .await?;

        let list_sql = format!(
            "{} {} ORDER BY a.applied_on DESC, a.id DESC LIMIT $4 OFFSET $5",
            DETAILS_SELECT, FILTER_CLAUSE
        );
        let rows = sqlx::query_as::<_, DetailsRow>(&list_sql)
            .bind(status)
            .bind(filter.applicant_id)
            .bind(filter.job_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(DetailsRow::into_details)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total, page))
    }

    async fn exists_for(&self, applicant_id: i64, job_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE applicant_id = $1 AND job_id = $2)",
        )
        .bind(applicant_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, draft: &ApplicationDraft) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (applicant_id, job_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, applicant_id, job_id, status, applied_on
            "#,
        )
        .bind(draft.applicant_id)
        .bind(draft.job_id)
        .bind(draft.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_APPLICATION))?;

        row.into_application()
    }

    async fn update(&self, id: i64, draft: &ApplicationDraft) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications
            SET applicant_id = $2, job_id = $3, status = $4
            WHERE id = $1
            RETURNING id, applicant_id, job_id, status, applied_on
            "#,
        )
        .bind(id)
        .bind(draft.applicant_id)
        .bind(draft.job_id)
        .bind(draft.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_APPLICATION))?
        .ok_or_else(|| AppError::NotFound(format!("Application with id {} not found", id)))?;

        row.into_application()
    }

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            UPDATE applications SET status = $2
            WHERE id = $1
            RETURNING id, applicant_id, job_id, status, applied_on
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ApplicationRow::into_application).transpose()
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Application with id {} not found", id)));
        }

        Ok(())
    }
}
