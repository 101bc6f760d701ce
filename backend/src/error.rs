use thiserror::Error;

use scheduler::ScheduleError;

/// Errors surfaced by this binary's service loop, layered over the
/// engine's own `ScheduleError` the way the engine's `ScheduleError` itself
/// layers over `fleet::FleetError`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("schedule failed for order {order_id}: {source}")]
    ScheduleFailed { order_id: String, source: ScheduleError },

    #[error("order submission channel closed")]
    SubmissionChannelClosed,

    #[error("execution backend rejected job {job_id}: {source}")]
    ExecutionRejected { job_id: String, source: anyhow::Error },
}
