//! Applicant Repository Implementation
//!
//! PostgreSQL implementation of the ApplicantRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::contains_pattern;
use crate::domain::{
    Applicant, ApplicantDraft, ApplicantFilter, ApplicantRepository, DUPLICATE_APPLICANT_EMAIL,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

/// Database row representation matching the applicants table schema.
#[derive(Debug, sqlx::FromRow)]
struct ApplicantRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    applied_on: DateTime<Utc>,
}

impl ApplicantRow {
    fn into_applicant(self) -> Applicant {
        Applicant {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            applied_on: self.applied_on,
        }
    }
}

/// PostgreSQL applicant repository implementation.
#[derive(Clone)]
pub struct PgApplicantRepository {
    pool: PgPool,
}

impl PgApplicantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicantRepository for PgApplicantRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Applicant>, AppError> {
        let row = sqlx::query_as::<_, ApplicantRow>(
            "SELECT id, name, email, phone, applied_on FROM applicants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ApplicantRow::into_applicant))
    }

    async fn list(
        &self,
        filter: &ApplicantFilter,
        page: PageRequest,
    ) -> Result<Page<Applicant>, AppError> {
        let pattern = filter.search.as_deref().map(contains_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM applicants
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, name, email, phone, applied_on FROM applicants
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY applied_on DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(ApplicantRow::into_applicant).collect(),
            total,
            page,
        ))
    }

    async fn create(&self, draft: &ApplicantDraft) -> Result<Applicant, AppError> {
        let row = sqlx::query_as::<_, ApplicantRow>(
            r#"
            INSERT INTO applicants (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, applied_on
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_APPLICANT_EMAIL))?;

        Ok(row.into_applicant())
    }

    async fn update(&self, id: i64, draft: &ApplicantDraft) -> Result<Applicant, AppError> {
        let row = sqlx::query_as::<_, ApplicantRow>(
            r#"
            UPDATE applicants
            SET name = $2, email = $3, phone = $4
            WHERE id = $1
            RETURNING id, name, email, phone, applied_on
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_APPLICANT_EMAIL))?
        .ok_or_else(|| AppError::NotFound(format!("Applicant with id {} not found", id)))?;

        Ok(row.into_applicant())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Applicant with id {} not found", id)));
        }

        Ok(())
    }

    async fn email_taken(&self, email: &str, except_id: Option<i64>) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applicants
                WHERE email = $1 AND ($2::bigint IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }
}
