use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use corelib::{required_consumption, InkConsumptionTable, Printer, ResourceSnapshot, SubOrderRequirement};
use parking_lot::Mutex;
use thiserror::Error;

use crate::queue::{BoundedQueue, QueueOverflow};

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("unknown printer: {0}")]
    UnknownPrinter(String),

    #[error("resource conflict on printer {0}: snapshot version {1} but printer is now at {2}")]
    Conflict(String, u64, u64),

    #[error("insufficient {resource} on printer {printer_id}: available {available}, needed {needed}")]
    InsufficientResource {
        printer_id: String,
        resource: String,
        available: f64,
        needed: f64,
    },

    #[error("queue full on printer {0}")]
    QueueOverflow(String),

    #[error("lock acquisition on printer {0} exceeded {1:?}")]
    LockTimeout(String, Duration),
}

impl From<QueueOverflow> for FleetError {
    fn from(_: QueueOverflow) -> Self {
        FleetError::QueueOverflow(String::new())
    }
}

/// Live, mutable state for one printer: the resources the Resource Manager
/// guards plus that printer's own bounded queue. Everything here sits
/// behind a single per-printer lock so paper/ink/version/queue mutations are
/// always consistent with each other.
pub struct PrinterRecord {
    pub printer: Printer,
    pub version: u64,
    pub queue: BoundedQueue,
}

/// Owns per-printer exclusive locks and each printer's monotonic version
/// counter. No lock here ever encloses another: printer locks are disjoint
/// from each other and from the queue-internal bookkeeping they guard
/// alongside, so cross-printer deadlock cannot occur.
pub struct ResourceManager {
    printers: HashMap<String, Arc<Mutex<PrinterRecord>>>,
    max_queue_length: usize,
    lock_timeout: Duration,
}

impl ResourceManager {
    pub fn new(fleet: Vec<Printer>, max_queue_length: usize, lock_timeout: Duration) -> Self {
        let printers = fleet
            .into_iter()
            .map(|printer| {
                let id = printer.id.clone();
                let record = PrinterRecord {
                    printer,
                    version: 0,
                    queue: BoundedQueue::new(max_queue_length),
                };
                (id, Arc::new(Mutex::new(record)))
            })
            .collect();

        Self {
            printers,
            max_queue_length,
            lock_timeout,
        }
    }

    pub fn printer_ids(&self) -> Vec<String> {
        self.printers.keys().cloned().collect()
    }

    pub fn is_online(&self, printer_id: &str) -> bool {
        self.printers
            .get(printer_id)
            .map(|p| p.lock().printer.online)
            .unwrap_or(false)
    }

    /// Run `f` with exclusive access to one printer's record. This is the
    /// `with_printer` scoped guard from the design: the lock is held only
    /// for the duration of `f` and released on return. Acquisition is bounded
    /// by `lock_timeout`; exceeding it surfaces as `FleetError::LockTimeout`
    /// rather than blocking the caller indefinitely.
    pub fn with_printer<R>(&self, printer_id: &str, f: impl FnOnce(&mut PrinterRecord) -> R) -> Result<R, FleetError> {
        let cell = self
            .printers
            .get(printer_id)
            .ok_or_else(|| FleetError::UnknownPrinter(printer_id.to_string()))?;
        let mut guard = cell
            .try_lock_for(self.lock_timeout)
            .ok_or_else(|| FleetError::LockTimeout(printer_id.to_string(), self.lock_timeout))?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self, printer_id: &str) -> Result<ResourceSnapshot, FleetError> {
        self.with_printer(printer_id, |record| ResourceSnapshot {
            printer_id: record.printer.id.clone(),
            version: record.version,
            paper_count: record.printer.paper_count.clone(),
            ink: record.printer.ink.clone(),
            queue_size: record.queue.size(),
            captured_at: Utc::now(),
        })
    }

    /// Atomically checks the snapshot's version, checks resource
    /// sufficiency, subtracts the required paper/ink, and bumps the
    /// version. No partial mutation is visible on any failure path.
    pub fn validate_and_consume(
        &self,
        printer_id: &str,
        requirement: &SubOrderRequirement,
        snapshot: &ResourceSnapshot,
        ink_table: &InkConsumptionTable,
    ) -> Result<(), FleetError> {
        self.with_printer(printer_id, |record| {
            if record.version != snapshot.version {
                return Err(FleetError::Conflict(printer_id.to_string(), snapshot.version, record.version));
            }

            let need = required_consumption(requirement, ink_table);

            for (kind, amount) in &need.paper {
                let available = *record.printer.paper_count.get(kind).unwrap_or(&0);
                if available < *amount {
                    return Err(FleetError::InsufficientResource {
                        printer_id: printer_id.to_string(),
                        resource: format!("paper:{kind}"),
                        available: available as f64,
                        needed: *amount as f64,
                    });
                }
            }

            for (channel, amount) in &need.ink {
                let available = *record.printer.ink.get(channel).unwrap_or(&0.0);
                if available < *amount {
                    return Err(FleetError::InsufficientResource {
                        printer_id: printer_id.to_string(),
                        resource: format!("ink:{channel}"),
                        available,
                        needed: *amount,
                    });
                }
            }

            for (kind, amount) in &need.paper {
                let entry = record.printer.paper_count.entry(kind.clone()).or_insert(0);
                *entry -= amount;
            }

            for (channel, amount) in &need.ink {
                let entry = record.printer.ink.entry(channel.clone()).or_insert(0.0);
                *entry = (*entry - amount).max(0.0);
            }

            record.version += 1;
            Ok(())
        })?
    }

    /// Returns consumed resources to a printer and bumps its version, the
    /// inverse of `validate_and_consume`. Used for enqueue rollback and
    /// cancellation. Ink is not un-clamped beyond the channel's floor of 0:
    /// a consumption that was clamped at 0 cannot be perfectly restored,
    /// which mirrors the original clamp-on-consume behavior.
    pub fn release(&self, printer_id: &str, requirement: &SubOrderRequirement, ink_table: &InkConsumptionTable) -> Result<(), FleetError> {
        self.with_printer(printer_id, |record| {
            let give_back = required_consumption(requirement, ink_table);

            for (kind, amount) in &give_back.paper {
                let entry = record.printer.paper_count.entry(kind.clone()).or_insert(0);
                *entry += amount;
            }

            for (channel, amount) in &give_back.ink {
                let entry = record.printer.ink.entry(channel.clone()).or_insert(0.0);
                *entry = (*entry + amount).min(100.0);
            }

            record.version += 1;
            Ok(())
        })?
    }

    pub fn apply_manual_update(
        &self,
        printer_id: &str,
        paper_delta: Option<BTreeMap<corelib::PaperKind, i64>>,
        ink_delta: Option<BTreeMap<corelib::InkChannel, f64>>,
    ) -> Result<(), FleetError> {
        self.with_printer(printer_id, |record| {
            if let Some(deltas) = paper_delta {
                for (kind, delta) in deltas {
                    let entry = record.printer.paper_count.entry(kind).or_insert(0);
                    *entry = (*entry as i64 + delta).max(0) as u32;
                }
            }

            if let Some(deltas) = ink_delta {
                for (channel, delta) in deltas {
                    let entry = record.printer.ink.entry(channel).or_insert(0.0);
                    *entry = (*entry + delta).clamp(0.0, 100.0);
                }
            }

            record.version += 1;
            Ok(())
        })?
    }

    pub fn set_online(&self, printer_id: &str, online: bool) -> Result<(), FleetError> {
        self.with_printer(printer_id, |record| {
            record.printer.online = online;
            record.version += 1;
            Ok(())
        })?
    }

    pub fn max_queue_length(&self) -> usize {
        self.max_queue_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{PaperKind, RequirementMap, TypeRequirement};
    use proptest::prelude::*;

    fn one_printer() -> Printer {
        Printer {
            id: "p1".into(),
            supported: Default::default(),
            paper_count: [(PaperKind::new("A4"), 10u32)].into_iter().collect(),
            ink: [(corelib::InkChannel::new("black"), 50.0)].into_iter().collect(),
            speed: 10.0,
            online: true,
            metadata: Default::default(),
        }
    }

    fn bw_requirement(pages: u32) -> SubOrderRequirement {
        let mut map = BTreeMap::new();
        map.insert(
            corelib::PrintType::new("bw"),
            TypeRequirement {
                paper_count: [(PaperKind::new("A4"), pages)].into_iter().collect(),
            },
        );
        RequirementMap(map)
    }

    #[test]
    fn consume_subtracts_and_bumps_version() {
        let rm = ResourceManager::new(vec![one_printer()], 10, Duration::from_secs(1));
        let snap = rm.snapshot("p1").unwrap();

        rm.validate_and_consume("p1", &bw_requirement(4), &snap, &InkConsumptionTable::default())
            .unwrap();

        let after = rm.snapshot("p1").unwrap();
        assert_eq!(after.version, 1);
        assert_eq!(after.paper_count[&PaperKind::new("A4")], 6);
    }

    #[test]
    fn stale_snapshot_conflicts() {
        let rm = ResourceManager::new(vec![one_printer()], 10, Duration::from_secs(1));
        let snap = rm.snapshot("p1").unwrap();

        rm.validate_and_consume("p1", &bw_requirement(1), &snap, &InkConsumptionTable::default())
            .unwrap();

        let err = rm
            .validate_and_consume("p1", &bw_requirement(1), &snap, &InkConsumptionTable::default())
            .unwrap_err();
        assert!(matches!(err, FleetError::Conflict(_, 0, 1)));
    }

    #[test]
    fn insufficient_paper_rejected_without_mutation() {
        let rm = ResourceManager::new(vec![one_printer()], 10, Duration::from_secs(1));
        let snap = rm.snapshot("p1").unwrap();

        let err = rm
            .validate_and_consume("p1", &bw_requirement(1000), &snap, &InkConsumptionTable::default())
            .unwrap_err();
        assert!(matches!(err, FleetError::InsufficientResource { .. }));

        let after = rm.snapshot("p1").unwrap();
        assert_eq!(after.version, 0);
        assert_eq!(after.paper_count[&PaperKind::new("A4")], 10);
    }

    #[test]
    fn release_restores_resources() {
        let rm = ResourceManager::new(vec![one_printer()], 10, Duration::from_secs(1));
        let snap = rm.snapshot("p1").unwrap();
        rm.validate_and_consume("p1", &bw_requirement(4), &snap, &InkConsumptionTable::default())
            .unwrap();

        rm.release("p1", &bw_requirement(4), &InkConsumptionTable::default()).unwrap();

        let after = rm.snapshot("p1").unwrap();
        assert_eq!(after.paper_count[&PaperKind::new("A4")], 10);
        assert_eq!(after.version, 2);
    }

    proptest! {
        /// Consuming then releasing the same requirement always restores
        /// the printer's paper count, regardless of how many pages the
        /// requirement asks for (as long as the printer starts with enough).
        #[test]
        fn consume_then_release_conserves_paper(starting in 50u32..5000, pages in 1u32..50) {
            let printer = Printer {
                id: "p1".into(),
                supported: Default::default(),
                paper_count: [(PaperKind::new("A4"), starting)].into_iter().collect(),
                ink: [(corelib::InkChannel::new("black"), 100.0)].into_iter().collect(),
                speed: 10.0,
                online: true,
                metadata: Default::default(),
            };
            let rm = ResourceManager::new(vec![printer], 10, Duration::from_secs(1));
            let req = bw_requirement(pages);
            let table = InkConsumptionTable::default();

            let snap = rm.snapshot("p1").unwrap();
            rm.validate_and_consume("p1", &req, &snap, &table).unwrap();
            rm.release("p1", &req, &table).unwrap();

            let after = rm.snapshot("p1").unwrap();
            prop_assert_eq!(after.paper_count[&PaperKind::new("A4")], starting);
            prop_assert_eq!(after.version, 2);
        }

        /// Every successful mutation bumps the version by exactly one, so a
        /// sequence of N successful consumes always lands on version N.
        #[test]
        fn version_increments_monotonically_over_n_consumes(n in 1usize..20) {
            let printer = Printer {
                id: "p1".into(),
                supported: Default::default(),
                paper_count: [(PaperKind::new("A4"), 10_000u32)].into_iter().collect(),
                ink: [(corelib::InkChannel::new("black"), 100.0)].into_iter().collect(),
                speed: 10.0,
                online: true,
                metadata: Default::default(),
            };
            let rm = ResourceManager::new(vec![printer], 10, Duration::from_secs(1));
            let table = InkConsumptionTable::default();

            for i in 0..n {
                let snap = rm.snapshot("p1").unwrap();
                prop_assert_eq!(snap.version, i as u64);
                rm.validate_and_consume("p1", &bw_requirement(1), &snap, &table).unwrap();
            }

            prop_assert_eq!(rm.snapshot("p1").unwrap().version, n as u64);
        }
    }
}
