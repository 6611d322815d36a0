use chrono::{DateTime, Utc};

use super::{BucketName, JobId, JobStatus};

/// Result reference recorded when the bucket was already present remotely.
pub const EXISTING_BUCKET_REFERENCE: &str = "existing";

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub bucket_name: BucketName,
    pub status: JobStatus,
    pub result_reference: Option<String>,
    pub error_detail: Option<String>,
    pub attempts: u32,
    /// Message of the most recent failed attempt, kept across redeliveries.
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(bucket_name: BucketName) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            bucket_name,
            status: JobStatus::Queued,
            result_reference: None,
            error_detail: None,
            attempts: 0,
            last_error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status change in place. The outcome fields follow the target
    /// status: only `Completed` keeps a result reference, only `Failed` keeps
    /// an error detail.
    pub fn transition(
        &mut self,
        status: JobStatus,
        result_reference: Option<&str>,
        error_detail: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), JobTransitionError> {
        if !self.status.can_transition_to(status) {
            return Err(JobTransitionError {
                from: self.status,
                to: status,
            });
        }

        self.status = status;
        self.result_reference = match status {
            JobStatus::Completed => result_reference.map(str::to_string),
            _ => None,
        };
        self.error_detail = match status {
            JobStatus::Failed => error_detail.map(str::to_string),
            _ => None,
        };
        self.updated_at = at;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("job cannot move from {from} to {to}")]
pub struct JobTransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}
