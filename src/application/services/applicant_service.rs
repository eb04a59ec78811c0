//! Applicant Service
//!
//! CRUD for applicants. Emails are unique and compared lower-case.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Applicant, ApplicantDraft, ApplicantFilter, ApplicantPatch, ApplicantRepository,
    DUPLICATE_APPLICANT_EMAIL,
};
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};

#[async_trait]
pub trait ApplicantService: Send + Sync {
    async fn list(&self, filter: ApplicantFilter, page: PageRequest)
        -> Result<Page<Applicant>, ApplicantError>;

    async fn get(&self, id: i64) -> Result<Applicant, ApplicantError>;

    async fn create(&self, draft: ApplicantDraft) -> Result<Applicant, ApplicantError>;

    /// Applies `patch` on top of the stored applicant.
    async fn update(&self, id: i64, patch: ApplicantPatch) -> Result<Applicant, ApplicantError>;

    async fn delete(&self, id: i64) -> Result<(), ApplicantError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicantError {
    #[error("Applicant not found")]
    NotFound,

    #[error("{}", DUPLICATE_APPLICANT_EMAIL)]
    EmailTaken,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ApplicantError> for AppError {
    fn from(err: ApplicantError) -> Self {
        match err {
            ApplicantError::NotFound => AppError::NotFound("Applicant not found".into()),
            ApplicantError::EmailTaken => AppError::Conflict(DUPLICATE_APPLICANT_EMAIL.into()),
            ApplicantError::Storage(e) => e,
        }
    }
}

pub struct ApplicantServiceImpl<R: ApplicantRepository> {
    repo: Arc<R>,
}

impl<R: ApplicantRepository> ApplicantServiceImpl<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn ensure_email_free(&self, email: &str, except_id: Option<i64>) -> Result<(), ApplicantError> {
        if self.repo.email_taken(email, except_id).await? {
            return Err(ApplicantError::EmailTaken);
        }
        Ok(())
    }
}

#[async_trait]
impl<R: ApplicantRepository + 'static> ApplicantService for ApplicantServiceImpl<R> {
    async fn list(
        &self,
        filter: ApplicantFilter,
        page: PageRequest,
    ) -> Result<Page<Applicant>, ApplicantError> {
        Ok(self.repo.list(&filter, page).await?)
    }

    async fn get(&self, id: i64) -> Result<Applicant, ApplicantError> {
        self.repo.find_by_id(id).await?.ok_or(ApplicantError::NotFound)
    }

    async fn create(&self, draft: ApplicantDraft) -> Result<Applicant, ApplicantError> {
        let draft = draft.normalized();
        self.ensure_email_free(&draft.email, None).await?;

        let applicant = self.repo.create(&draft).await.map_err(conflict_as_taken)?;
        tracing::info!(applicant_id = applicant.id, "Applicant created");
        Ok(applicant)
    }

    async fn update(&self, id: i64, patch: ApplicantPatch) -> Result<Applicant, ApplicantError> {
        let existing = self.get(id).await?;
        let draft = ApplicantDraft::from_existing(&existing).apply(patch).normalized();

        if draft.email != existing.email {
            self.ensure_email_free(&draft.email, Some(id)).await?;
        }

        self.repo.update(id, &draft).await.map_err(conflict_as_taken)
    }

    async fn delete(&self, id: i64) -> Result<(), ApplicantError> {
        self.repo.delete(id).await.map_err(|e| match e {
            AppError::NotFound(_) => ApplicantError::NotFound,
            other => other.into(),
        })
    }
}

/// A unique violation that slipped past the pre-check (concurrent insert).
fn conflict_as_taken(err: AppError) -> ApplicantError {
    match err {
        AppError::Conflict(_) => ApplicantError::EmailTaken,
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockApplicantRepository;
    use chrono::Utc;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use mockall::predicate::{always, eq};

    fn stored(id: i64, email: &str) -> Applicant {
        Applicant {
            id,
            name: Name().fake(),
            email: email.into(),
            phone: None,
            applied_on: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_lowercases_email_before_checking_uniqueness() {
        let mut repo = MockApplicantRepository::new();
        repo.expect_email_taken()
            .with(eq("ann@example.com"), eq(None::<i64>))
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|d| d.email == "ann@example.com")
            .returning(|d| Ok(stored(1, &d.email)));

        let service = ApplicantServiceImpl::new(Arc::new(repo));
        let created = service
            .create(ApplicantDraft {
                name: "Ann".into(),
                email: "Ann@Example.com".into(),
                phone: None,
            })
            .await
            .unwrap();

        assert_eq!(created.email, "ann@example.com");
    }

    #[tokio::test]
    async fn create_with_taken_email_conflicts() {
        let mut repo = MockApplicantRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(true));
        repo.expect_create().never();

        let email: String = SafeEmail().fake();
        let service = ApplicantServiceImpl::new(Arc::new(repo));
        let err = service
            .create(ApplicantDraft {
                name: "Bob".into(),
                email,
                phone: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_without_email_change_skips_uniqueness_check() {
        let mut repo = MockApplicantRepository::new();
        repo.expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(stored(id, "same@example.com"))));
        repo.expect_email_taken().never();
        repo.expect_update()
            .with(eq(3), always())
            .returning(|id, d| {
                Ok(Applicant {
                    name: d.name.clone(),
                    ..stored(id, &d.email)
                })
            });

        let service = ApplicantServiceImpl::new(Arc::new(repo));
        let updated = service
            .update(
                3,
                ApplicantPatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn missing_applicant_is_not_found() {
        let mut repo = MockApplicantRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ApplicantServiceImpl::new(Arc::new(repo));
        let err = service.get(99).await.unwrap_err();
        assert!(matches!(err, ApplicantError::NotFound));
    }
}
