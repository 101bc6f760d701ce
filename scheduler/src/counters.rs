use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Purely observational counters; nothing here feeds back into scheduling
/// decisions.
#[derive(Clone, Default)]
pub struct Counters {
    pub schedules_attempted: Arc<AtomicU64>,
    pub schedules_succeeded: Arc<AtomicU64>,
    pub conflicts: Arc<AtomicU64>,
    pub queue_overflows: Arc<AtomicU64>,
    pub insufficient_resource: Arc<AtomicU64>,
    pub no_capable_printer: Arc<AtomicU64>,
    pub cache_hits: Arc<AtomicU64>,
    pub cache_misses: Arc<AtomicU64>,
}

impl Counters {
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            schedules_attempted: self.schedules_attempted.load(Ordering::Relaxed),
            schedules_succeeded: self.schedules_succeeded.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            queue_overflows: self.queue_overflows.load(Ordering::Relaxed),
            insufficient_resource: self.insufficient_resource.load(Ordering::Relaxed),
            no_capable_printer: self.no_capable_printer.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountersSnapshot {
    pub schedules_attempted: u64,
    pub schedules_succeeded: u64,
    pub conflicts: u64,
    pub queue_overflows: u64,
    pub insufficient_resource: u64,
    pub no_capable_printer: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
