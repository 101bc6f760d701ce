use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minimal operational counters for the demo service loop, distinct from
/// the engine's own `scheduler::Counters` (which tracks scheduling outcomes
/// only). These track the service-boundary concerns: how many jobs made it
/// to the execution backend and how their webhook callbacks resolved.
#[derive(Clone, Default)]
pub struct Counters {
    pub orders_submitted: Arc<AtomicU64>,
    pub orders_scheduled: Arc<AtomicU64>,
    pub orders_rejected: Arc<AtomicU64>,
    pub jobs_submitted_to_backend: Arc<AtomicU64>,
    pub jobs_completed: Arc<AtomicU64>,
    pub jobs_failed: Arc<AtomicU64>,
}

impl Counters {
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            orders_submitted: self.orders_submitted.load(Ordering::Relaxed),
            orders_scheduled: self.orders_scheduled.load(Ordering::Relaxed),
            orders_rejected: self.orders_rejected.load(Ordering::Relaxed),
            jobs_submitted_to_backend: self.jobs_submitted_to_backend.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountersSnapshot {
    pub orders_submitted: u64,
    pub orders_scheduled: u64,
    pub orders_rejected: u64,
    pub jobs_submitted_to_backend: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
}
