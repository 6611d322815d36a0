use std::time::Duration;

use bucketlink::application::ports::{JobRepository, RepositoryError};
use bucketlink::domain::{BucketName, Job, JobStatus};

use crate::helpers::TestPostgres;

fn job(name: &str) -> Job {
    Job::new(BucketName::parse(name).unwrap())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_new_job_when_creating_and_retrieving_then_job_is_persisted() {
    let test_pg = TestPostgres::new().await;
    let job = job("persisted");

    test_pg
        .job_repository
        .create(&job)
        .await
        .expect("Failed to create job");

    let retrieved = test_pg
        .job_repository
        .get_by_id(job.id)
        .await
        .expect("Failed to retrieve job")
        .expect("Job not found");

    assert_eq!(retrieved.id, job.id);
    assert_eq!(retrieved.bucket_name, job.bucket_name);
    assert_eq!(retrieved.status, JobStatus::Queued);
    assert_eq!(retrieved.attempts, 0);
    assert!(retrieved.result_reference.is_none());
    assert!(retrieved.error_detail.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_same_id_twice_when_creating_then_duplicate_id_error() {
    let test_pg = TestPostgres::new().await;
    let job = job("twice");
    test_pg.job_repository.create(&job).await.unwrap();

    let result = test_pg.job_repository.create(&job).await;

    assert!(matches!(result, Err(RepositoryError::DuplicateId(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_processing_job_when_completed_then_reference_is_stored_and_updated_at_advances() {
    let test_pg = TestPostgres::new().await;
    let job = job("complete-me");
    test_pg.job_repository.create(&job).await.unwrap();

    test_pg
        .job_repository
        .update_status(job.id, JobStatus::Processing, None, None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    test_pg
        .job_repository
        .update_status(job.id, JobStatus::Completed, Some("0xabc"), Some("ignored"))
        .await
        .unwrap();

    let stored = test_pg
        .job_repository
        .get_by_id(job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.result_reference.as_deref(), Some("0xabc"));
    assert!(stored.error_detail.is_none());
    assert!(stored.updated_at > job.updated_at);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_terminal_job_when_updating_again_then_invalid_transition() {
    let test_pg = TestPostgres::new().await;
    let job = job("terminal");
    test_pg.job_repository.create(&job).await.unwrap();
    test_pg
        .job_repository
        .update_status(job.id, JobStatus::Failed, None, Some("boom"))
        .await
        .unwrap();

    let result = test_pg
        .job_repository
        .update_status(job.id, JobStatus::Completed, Some("0xlate"), None)
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::InvalidTransition {
            from: JobStatus::Failed,
            to: JobStatus::Completed,
            ..
        })
    ));
    let stored = test_pg
        .job_repository
        .get_by_id(job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.error_detail.as_deref(), Some("boom"));
    assert!(stored.result_reference.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_unknown_job_when_updating_then_not_found() {
    let test_pg = TestPostgres::new().await;
    let job = job("never-stored");

    let result = test_pg
        .job_repository
        .update_status(job.id, JobStatus::Processing, None, None)
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_open_job_when_recording_failures_then_attempts_persist() {
    let test_pg = TestPostgres::new().await;
    let job = job("flaky");
    test_pg.job_repository.create(&job).await.unwrap();

    assert_eq!(
        test_pg
            .job_repository
            .record_failed_attempt(job.id, "gateway timeout")
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        test_pg
            .job_repository
            .record_failed_attempt(job.id, "ledger congested")
            .await
            .unwrap(),
        2
    );

    let stored = test_pg
        .job_repository
        .get_by_id(job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.attempts, 2);
    assert_eq!(stored.last_error.as_deref(), Some("ledger congested"));
    assert!(stored.error_detail.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_open_and_closed_jobs_when_listing_unfinished_then_only_open_rows_oldest_first() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.job_repository;

    let mut stalled = job("stalled");
    stalled.created_at -= chrono::Duration::minutes(5);
    let waiting = job("waiting");
    let done = job("done");
    for j in [&stalled, &waiting, &done] {
        repo.create(j).await.unwrap();
    }
    repo.update_status(stalled.id, JobStatus::Processing, None, None)
        .await
        .unwrap();
    repo.record_failed_attempt(stalled.id, "connection reset")
        .await
        .unwrap();
    repo.update_status(done.id, JobStatus::Completed, Some("0x9"), None)
        .await
        .unwrap();

    let unfinished = repo.list_unfinished().await.unwrap();

    let names: Vec<&str> = unfinished.iter().map(|j| j.bucket_name.as_str()).collect();
    assert_eq!(names, vec!["stalled", "waiting"]);
    assert_eq!(unfinished[0].status, JobStatus::Processing);
    assert_eq!(unfinished[0].attempts, 1);
    assert_eq!(unfinished[0].last_error.as_deref(), Some("connection reset"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_completed_jobs_when_listing_then_newest_first_and_others_excluded() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.job_repository;

    let mut older = job("older");
    older.created_at -= chrono::Duration::minutes(5);
    let newer = job("newer");
    let pending = job("pending");
    for j in [&older, &newer, &pending] {
        repo.create(j).await.unwrap();
    }
    repo.update_status(older.id, JobStatus::Completed, Some("0x1"), None)
        .await
        .unwrap();
    repo.update_status(newer.id, JobStatus::Completed, Some("existing"), None)
        .await
        .unwrap();

    let completed = repo.list_completed().await.unwrap();

    let names: Vec<&str> = completed.iter().map(|b| b.bucket_name.as_str()).collect();
    assert_eq!(names, vec!["newer", "older"]);
    assert_eq!(completed[0].result_reference.as_deref(), Some("existing"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_live_database_when_pinging_then_ok() {
    let test_pg = TestPostgres::new().await;
    assert!(test_pg.job_repository.ping().await.is_ok());
}
