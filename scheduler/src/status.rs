use std::collections::{BTreeMap, BTreeSet};

use corelib::{InkChannel, PaperKind, PrinterMetadata, PrintType};
use serde::{Deserialize, Serialize};

const LOW_PAPER_THRESHOLD: u32 = 10;
const LOW_INK_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrinterHealth {
    Ready,
    LowPaper,
    LowInk,
    QueueFull,
    Offline,
}

/// One job sitting in a printer's queue, as echoed back to a status caller.
/// `position` is 1-based: the job a subsequent pop would return next is
/// position 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedJobView {
    pub order_id: String,
    pub priority: u8,
    pub types: BTreeSet<PrintType>,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterStatusView {
    pub id: String,
    pub supported: BTreeSet<PrintType>,
    pub paper_count: BTreeMap<PaperKind, u32>,
    pub ink: BTreeMap<InkChannel, f64>,
    pub speed: f64,
    pub queue_size: usize,
    pub queue_capacity: usize,
    pub status: PrinterHealth,
    pub metadata: PrinterMetadata,
    pub queued_jobs: Vec<QueuedJobView>,
}

pub fn derive_health(
    online: bool,
    paper_count: &BTreeMap<PaperKind, u32>,
    ink: &BTreeMap<InkChannel, f64>,
    queue_size: usize,
    queue_capacity: usize,
) -> PrinterHealth {
    if !online {
        return PrinterHealth::Offline;
    }
    if queue_size >= queue_capacity {
        return PrinterHealth::QueueFull;
    }
    if paper_count.values().any(|&c| c < LOW_PAPER_THRESHOLD) {
        return PrinterHealth::LowPaper;
    }
    if ink.values().any(|&pct| pct < LOW_INK_THRESHOLD) {
        return PrinterHealth::LowInk;
    }
    PrinterHealth::Ready
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SystemStatus {
    pub total_printers: usize,
    pub ready_printers: usize,
    pub total_queued_jobs: usize,
    pub cache_entries: usize,
    /// Supplemental aggregate, derived on demand rather than persisted.
    pub average_queue_length: f64,
    pub max_queue_length_observed: usize,
    /// `schedules_succeeded / schedules_attempted * 100`, over the engine's
    /// lifetime counters; `100.0` when nothing has been attempted yet.
    pub success_rate_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_takes_precedence_over_everything() {
        let health = derive_health(false, &BTreeMap::new(), &BTreeMap::new(), 10, 10);
        assert_eq!(health, PrinterHealth::Offline);
    }

    #[test]
    fn queue_full_before_low_paper() {
        let paper = BTreeMap::from([(PaperKind::new("A4"), 2)]);
        let health = derive_health(true, &paper, &BTreeMap::new(), 10, 10);
        assert_eq!(health, PrinterHealth::QueueFull);
    }

    #[test]
    fn low_paper_detected() {
        let paper = BTreeMap::from([(PaperKind::new("A4"), 5)]);
        let health = derive_health(true, &paper, &BTreeMap::new(), 0, 10);
        assert_eq!(health, PrinterHealth::LowPaper);
    }

    #[test]
    fn ready_when_everything_is_fine() {
        let paper = BTreeMap::from([(PaperKind::new("A4"), 100)]);
        let ink = BTreeMap::from([(InkChannel::new("black"), 80.0)]);
        let health = derive_health(true, &paper, &ink, 1, 10);
        assert_eq!(health, PrinterHealth::Ready);
    }
}
