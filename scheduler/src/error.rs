use thiserror::Error;

use fleet::FleetError;

/// The six error kinds the scheduling engine surfaces, per its external
/// contract. `ValidationError` is never retried; `ResourceConflict` is the
/// only kind produced after retries are exhausted.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("no capable printer for types: {0:?}")]
    NoCapablePrinter(Vec<String>),

    #[error("insufficient resource on printer {printer_id}: {resource} available {available}, needed {needed}")]
    InsufficientResource {
        printer_id: String,
        resource: String,
        available: f64,
        needed: f64,
    },

    #[error("queue overflow on printers: {0:?}")]
    QueueOverflow(Vec<String>),

    #[error("resource conflict: retries exhausted for order {0}")]
    ResourceConflict(String),

    #[error("scheduler internal error: {0}")]
    SchedulerInternal(String),
}

impl From<FleetError> for ScheduleError {
    fn from(err: FleetError) -> Self {
        match err {
            FleetError::UnknownPrinter(id) => ScheduleError::SchedulerInternal(format!("unknown printer: {id}")),
            FleetError::Conflict(id, ..) => ScheduleError::ResourceConflict(id),
            FleetError::InsufficientResource {
                printer_id,
                resource,
                available,
                needed,
            } => ScheduleError::InsufficientResource {
                printer_id,
                resource,
                available,
                needed,
            },
            FleetError::QueueOverflow(id) => ScheduleError::QueueOverflow(vec![id]),
            FleetError::LockTimeout(id, timeout) => {
                ScheduleError::SchedulerInternal(format!("lock acquisition on printer {id} exceeded {timeout:?}"))
            }
        }
    }
}
