use chrono::{DateTime, Utc};
use corelib::SubOrderRequirement;
use serde::{Deserialize, Serialize};

/// What the scheduling engine hands to the external execution backend once
/// `validate_and_consume` and the enqueue have both succeeded. The engine
/// itself never constructs or sends this; it is built by the façade from an
/// `AssignmentResult` and handed to an `ExecutionBackend`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionJob {
    /// Equal to the order id the reserved job was created under.
    pub job_id: String,
    pub printer_id: String,
    pub sub_order: SubOrderRequirement,
}

/// Lifecycle states the opaque backend reports via webhook, per the
/// engine's external contract (spec §6). The engine does not emit or
/// consume these; they exist so a façade and this workspace's demo backend
/// share one typed shape instead of each inventing their own strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Printing,
    Completed,
    Failed,
}

/// One webhook callback from the execution backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobUpdate {
    pub job_id: String,
    pub status: JobStatus,
    pub progress_percent: f64,
    pub printer_id: String,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl JobUpdate {
    /// Clamp `progress_percent` into `[0, 100]`. The contract promises this
    /// range but the backend is opaque and may not honor it; callers that
    /// display progress should go through this rather than trusting the
    /// raw field.
    pub fn clamped_progress(&self) -> f64 {
        self.progress_percent.clamp(0.0, 100.0)
    }
}
