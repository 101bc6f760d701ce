use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::{InkChannel, PaperKind, PrintType};

fn default_true() -> bool {
    true
}

/// Metadata the engine carries but never reads or mutates. Printer-specific
/// housekeeping information belongs here, not on the fields the Resource
/// Manager touches.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PrinterMetadata {
    pub location: Option<String>,
    pub firmware: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    #[serde(default)]
    pub total_pages_printed: u64,
    pub last_maintenance_at: Option<DateTime<Utc>>,
}

/// Static definition of one printer in the fleet. Consumable levels here are
/// the values at fleet-construction time; afterwards they are owned and
/// mutated exclusively by the Resource Manager.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Printer {
    pub id: String,
    pub supported: BTreeSet<PrintType>,
    pub paper_count: BTreeMap<PaperKind, u32>,
    pub ink: BTreeMap<InkChannel, f64>,
    pub speed: f64,
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default)]
    pub metadata: PrinterMetadata,
}

impl Printer {
    pub fn supports_all(&self, types: &BTreeSet<PrintType>) -> bool {
        types.iter().all(|t| self.supported.contains(t))
    }
}

/// Immutable capture of a printer's consumable state and version, taken
/// before a validate-and-consume attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceSnapshot {
    pub printer_id: String,
    pub version: u64,
    pub paper_count: BTreeMap<PaperKind, u32>,
    pub ink: BTreeMap<InkChannel, f64>,
    pub queue_size: usize,
    pub captured_at: DateTime<Utc>,
}
