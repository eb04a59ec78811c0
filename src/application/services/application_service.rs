//! Application Service
//!
//! Job applications: the apply flow, duplicate protection and status updates.
//! An applicant may hold at most one application per job.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    Application, ApplicantRepository, ApplicationDetails, ApplicationDraft, ApplicationFilter,
    ApplicationPatch, ApplicationRepository, ApplicationStatus, JobRepository, DUPLICATE_APPLICATION,
};
use crate::infrastructure::metrics;
use crate::shared::error::{AppError, FieldError};
use crate::shared::pagination::{Page, PageRequest};

/// Request field names that carry the applicant and job ids.
#[derive(Debug, Clone, Copy)]
struct RefFields {
    applicant: &'static str,
    job: &'static str,
}

const APPLY_FIELDS: RefFields = RefFields {
    applicant: "applicant_id",
    job: "job_id",
};

const RESOURCE_FIELDS: RefFields = RefFields {
    applicant: "applicant",
    job: "job",
};

#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetails>, ApplicationError>;

    async fn get(&self, id: i64) -> Result<ApplicationDetails, ApplicationError>;

    /// Submit a new application with status `applied`.
    async fn apply(&self, applicant_id: i64, job_id: i64)
        -> Result<ApplicationDetails, ApplicationError>;

    /// Create with an explicit status; same checks as `apply`.
    async fn create(&self, draft: ApplicationDraft) -> Result<ApplicationDetails, ApplicationError>;

    async fn update(
        &self,
        id: i64,
        patch: ApplicationPatch,
    ) -> Result<ApplicationDetails, ApplicationError>;

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<ApplicationDetails, ApplicationError>;

    async fn delete(&self, id: i64) -> Result<(), ApplicationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Application not found")]
    NotFound,

    /// Referenced applicant or job does not exist.
    #[error("Invalid reference")]
    InvalidReference(Vec<FieldError>),

    #[error("{}", DUPLICATE_APPLICATION)]
    Duplicate,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl From<ApplicationError> for AppError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound => AppError::NotFound("Application not found".into()),
            ApplicationError::InvalidReference(errors) => AppError::Validation(errors),
            ApplicationError::Duplicate => AppError::Conflict(DUPLICATE_APPLICATION.into()),
            ApplicationError::Storage(e) => e,
        }
    }
}

pub struct ApplicationServiceImpl<A, J, R>
where
    A: ApplicantRepository,
    J: JobRepository,
    R: ApplicationRepository,
{
    applicant_repo: Arc<A>,
    job_repo: Arc<J>,
    application_repo: Arc<R>,
}

impl<A, J, R> ApplicationServiceImpl<A, J, R>
where
    A: ApplicantRepository,
    J: JobRepository,
    R: ApplicationRepository,
{
    pub fn new(applicant_repo: Arc<A>, job_repo: Arc<J>, application_repo: Arc<R>) -> Self {
        Self {
            applicant_repo,
            job_repo,
            application_repo,
        }
    }

    /// Both ids must resolve; every missing one is reported under `fields`.
    async fn check_references(
        &self,
        applicant_id: i64,
        job_id: i64,
        fields: RefFields,
    ) -> Result<(), ApplicationError> {
        let mut errors = Vec::new();

        if self.applicant_repo.find_by_id(applicant_id).await?.is_none() {
            errors.push(FieldError::new(
                fields.applicant,
                format!("Applicant with ID {} does not exist.", applicant_id),
            ));
        }
        if self.job_repo.find_by_id(job_id).await?.is_none() {
            errors.push(FieldError::new(
                fields.job,
                format!("Job with ID {} does not exist.", job_id),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApplicationError::InvalidReference(errors))
        }
    }

    async fn ensure_not_applied(&self, applicant_id: i64, job_id: i64) -> Result<(), ApplicationError> {
        if self.application_repo.exists_for(applicant_id, job_id).await? {
            metrics::record_duplicate_application();
            return Err(ApplicationError::Duplicate);
        }
        Ok(())
    }

    async fn submit(
        &self,
        draft: ApplicationDraft,
        fields: RefFields,
    ) -> Result<ApplicationDetails, ApplicationError> {
        self.check_references(draft.applicant_id, draft.job_id, fields).await?;
        self.ensure_not_applied(draft.applicant_id, draft.job_id).await?;

        // The UNIQUE constraint still catches a concurrent duplicate here.
        let application = self
            .application_repo
            .create(&draft)
            .await
            .map_err(conflict_as_duplicate)?;

        metrics::record_application_submitted();
        tracing::info!(
            application_id = application.id,
            applicant_id = draft.applicant_id,
            job_id = draft.job_id,
            "Application submitted"
        );

        self.details(&application).await
    }

    async fn details(&self, application: &Application) -> Result<ApplicationDetails, ApplicationError> {
        self.application_repo
            .find_by_id(application.id)
            .await?
            .ok_or(ApplicationError::NotFound)
    }
}

fn conflict_as_duplicate(err: AppError) -> ApplicationError {
    match err {
        AppError::Conflict(_) => {
            metrics::record_duplicate_application();
            ApplicationError::Duplicate
        }
        AppError::NotFound(_) => ApplicationError::NotFound,
        other => other.into(),
    }
}

#[async_trait]
impl<A, J, R> ApplicationService for ApplicationServiceImpl<A, J, R>
where
    A: ApplicantRepository + 'static,
    J: JobRepository + 'static,
    R: ApplicationRepository + 'static,
{
    async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
    ) -> Result<Page<ApplicationDetails>, ApplicationError> {
        Ok(self.application_repo.list(&filter, page).await?)
    }

    async fn get(&self, id: i64) -> Result<ApplicationDetails, ApplicationError> {
        self.application_repo
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::NotFound)
    }

    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
    ) -> Result<ApplicationDetails, ApplicationError> {
        let draft = ApplicationDraft {
            applicant_id,
            job_id,
            status: ApplicationStatus::Applied,
        };
        self.submit(draft, APPLY_FIELDS).await
    }

    async fn create(&self, draft: ApplicationDraft) -> Result<ApplicationDetails, ApplicationError> {
        self.submit(draft, RESOURCE_FIELDS).await
    }

    async fn update(
        &self,
        id: i64,
        patch: ApplicationPatch,
    ) -> Result<ApplicationDetails, ApplicationError> {
        let existing = self.get(id).await?.application;
        let draft = ApplicationDraft::from_existing(&existing).apply(patch);

        if draft.changes_pair(&existing) {
            self.check_references(draft.applicant_id, draft.job_id, RESOURCE_FIELDS)
                .await?;
            self.ensure_not_applied(draft.applicant_id, draft.job_id).await?;
        }

        let application = self
            .application_repo
            .update(id, &draft)
            .await
            .map_err(conflict_as_duplicate)?;

        self.details(&application).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<ApplicationDetails, ApplicationError> {
        let application = self
            .application_repo
            .update_status(id, status)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        tracing::info!(application_id = id, status = %status, "Application status changed");
        self.details(&application).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApplicationError> {
        self.application_repo.delete(id).await.map_err(|e| match e {
            AppError::NotFound(_) => ApplicationError::NotFound,
            other => other.into(),
        })
    }
}
