//! The typed boundary between the scheduling engine and the opaque external
//! execution backend described in the engine's external contract. Nothing
//! in this crate schedules, reserves, or mutates printer state; it exists
//! so the `backend` demo binary (and any real façade) has one shared shape
//! for submitting jobs and receiving progress callbacks.

pub mod types;

use async_trait::async_trait;

pub use types::{ExecutionJob, JobStatus, JobUpdate};

/// Abstraction over the print-hardware execution layer. Intentionally
/// hides queueing, firmware protocols, and retry policy from the
/// scheduling engine: an implementor accepts a reserved job and is
/// responsible for eventually reporting its outcome out of band (webhook,
/// poll, whatever the real backend uses).
#[async_trait]
pub trait ExecutionBackend: Send + Sync + 'static {
    async fn submit_job(&self, job: ExecutionJob) -> anyhow::Result<()>;
}

/// Receives the webhook-shaped callbacks an execution backend reports.
/// Split from `ExecutionBackend` because a submitter and a callback
/// consumer are frequently different processes (a façade submits; a
/// webhook route receives).
pub trait JobUpdateSink: Send + Sync + 'static {
    fn on_update(&self, update: JobUpdate);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use corelib::RequirementMap;

    #[test]
    fn progress_percent_is_clamped_for_display() {
        let update = JobUpdate {
            job_id: "o1".into(),
            status: JobStatus::Printing,
            progress_percent: 142.0,
            printer_id: "P1".into(),
            message: None,
            timestamp: Utc::now(),
        };
        assert_eq!(update.clamped_progress(), 100.0);
    }

    #[tokio::test]
    async fn execution_backend_trait_is_object_safe() {
        struct Noop;

        #[async_trait]
        impl ExecutionBackend for Noop {
            async fn submit_job(&self, _job: ExecutionJob) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let backend: Box<dyn ExecutionBackend> = Box::new(Noop);
        let job = ExecutionJob {
            job_id: "o1".into(),
            printer_id: "P1".into(),
            sub_order: RequirementMap::default(),
        };
        backend.submit_job(job).await.unwrap();
    }
}
