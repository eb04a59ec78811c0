//! Applicant, job and application repositories

use sqlx::PgPool;

use recruit_sales_api::domain::{
    ApplicantDraft, ApplicantFilter, ApplicantRepository, ApplicationDraft, ApplicationFilter,
    ApplicationRepository, ApplicationStatus, JobDraft, JobRepository,
};
use recruit_sales_api::infrastructure::repositories::{
    PgApplicantRepository, PgApplicationRepository, PgJobRepository,
};
use recruit_sales_api::shared::error::AppError;
use recruit_sales_api::shared::pagination::PageRequest;

async fn seed(pool: &PgPool) -> (i64, i64) {
    let applicant = PgApplicantRepository::new(pool.clone())
        .create(&ApplicantDraft {
            name: "Ann Lee".into(),
            email: "ann@example.com".into(),
            phone: None,
        })
        .await
        .unwrap();
    let job = PgJobRepository::new(pool.clone())
        .create(&JobDraft {
            title: "Backend Engineer".into(),
            description: "Rust services".into(),
        })
        .await
        .unwrap();
    (applicant.id, job.job.id)
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn second_application_for_same_pair_conflicts(pool: PgPool) {
    let (applicant_id, job_id) = seed(&pool).await;
    let repo = PgApplicationRepository::new(pool.clone());
    let draft = ApplicationDraft {
        applicant_id,
        job_id,
        status: ApplicationStatus::Applied,
    };

    repo.create(&draft).await.unwrap();
    let second = repo.create(&draft).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert!(repo.exists_for(applicant_id, job_id).await.unwrap());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn status_filter_and_job_counts(pool: PgPool) {
    let (applicant_id, job_id) = seed(&pool).await;
    let repo = PgApplicationRepository::new(pool.clone());
    let application = repo
        .create(&ApplicationDraft {
            applicant_id,
            job_id,
            status: ApplicationStatus::Applied,
        })
        .await
        .unwrap();

    let updated = repo
        .update_status(application.id, ApplicationStatus::Shortlisted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ApplicationStatus::Shortlisted);

    let shortlisted = repo
        .list(
            &ApplicationFilter {
                status: Some(ApplicationStatus::Shortlisted),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(shortlisted.total, 1);
    assert_eq!(shortlisted.items[0].job.application_count, 1);

    let rejected = repo
        .list(
            &ApplicationFilter {
                status: Some(ApplicationStatus::Rejected),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(rejected.total, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn applicant_search_is_case_insensitive(pool: PgPool) {
    seed(&pool).await;
    let repo = PgApplicantRepository::new(pool);

    let by_name = repo
        .list(
            &ApplicantFilter {
                search: Some("ANN".into()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_name.total, 1);

    let by_email = repo
        .list(
            &ApplicantFilter {
                search: Some("example.COM".into()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_email.total, 1);

    let wildcard = repo
        .list(
            &ApplicantFilter {
                search: Some("%".into()),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(wildcard.total, 0);
}
