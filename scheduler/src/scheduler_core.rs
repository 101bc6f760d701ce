//! Top-level orchestration: validate -> cache -> plan -> score -> reserve ->
//! enqueue, with bounded retry on version conflict. This is the engine's
//! single entry point; everything else in this crate exists to serve it.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use corelib::{InkConsumptionTable, Order, Printer, ReservedJob, SubOrderRequirement, Weights};
use fleet::{CapabilityIndex, FleetError, ResourceManager};
use tracing::instrument;
use uuid::Uuid;

use crate::assignment_cache::{cache_key, AssignmentCache, PrinterDigest};
use crate::config::EngineConfig;
use crate::counters::{Counters, CountersSnapshot};
use crate::error::ScheduleError;
use crate::planner::plan_sub_orders;
use crate::result::AssignmentResult;
use crate::scorer::score;
use crate::status::{derive_health, PrinterStatusView, SystemStatus};
use crate::validator::{validate_fleet, validate_order, validate_weights};

/// Caller-supplied tie-break preference among equally-scored printers:
/// lower index wins. Printers absent from the map sort after all present
/// ones, by id.
pub type PriorityMap = HashMap<String, u32>;

pub struct SchedulerEngine {
    resource_manager: ResourceManager,
    capability: CapabilityIndex,
    cache: AssignmentCache,
    config: EngineConfig,
    weights: Weights,
    counters: Counters,
}

impl SchedulerEngine {
    pub fn construct(fleet: Vec<Printer>, weights: Option<Weights>, config: EngineConfig) -> Result<Self, ScheduleError> {
        validate_fleet(&fleet)?;
        let weights = weights.unwrap_or(config.default_weights);
        validate_weights(&weights)?;

        let capability = CapabilityIndex::build(&fleet);
        let resource_manager = ResourceManager::new(fleet, config.max_queue_length, config.lock_timeout);
        let cache = AssignmentCache::new(config.cache_ttl);

        Ok(Self {
            resource_manager,
            capability,
            cache,
            config,
            weights,
            counters: Counters::default(),
        })
    }

    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    #[instrument(skip(self, order, priority_map), fields(order_id = tracing::field::Empty))]
    pub async fn schedule_order(
        &self,
        order: Order,
        order_id: Option<String>,
        priority: u8,
        priority_map: Option<PriorityMap>,
    ) -> Result<AssignmentResult, ScheduleError> {
        validate_order(&order)?;
        self.counters.schedules_attempted.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let order_id = order_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        tracing::Span::current().record("order_id", tracing::field::display(&order_id));

        let digest = self.fleet_digest();
        let key = cache_key(&order, &digest);
        if let Some(cached) = self.cache.get(&key) {
            self.counters.cache_hits.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            return Ok(cached);
        }
        self.counters.cache_misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        let is_online = |id: &str| self.resource_manager.is_online(id);
        let sub_orders = plan_sub_orders(&order, &self.capability, &is_online)?;

        let mut assignments = Vec::with_capacity(sub_orders.len());
        let mut scores = Vec::with_capacity(sub_orders.len());
        let mut sub_order_types = Vec::with_capacity(sub_orders.len());

        for sub_order in &sub_orders {
            let (printer_id, sub_score) = self
                .schedule_sub_order(sub_order, &order_id, priority, priority_map.as_ref())
                .await?;

            assignments.push(printer_id);
            scores.push(sub_score);
            sub_order_types.push(sub_order.types().into_iter().map(|t| t.to_string()).collect());
        }

        let result = AssignmentResult {
            order_id: order_id.clone(),
            assignments,
            scores,
            sub_orders: sub_order_types,
            timestamp: Utc::now(),
        };

        self.cache.insert(key, result.clone());
        self.counters.schedules_succeeded.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Ok(result)
    }

    /// Score, reserve and enqueue a single sub-order, retrying only this
    /// sub-order's attempt on a version conflict. Earlier sub-orders in the
    /// same order that already committed are left as-is: the engine does
    /// not roll back a whole order on a later sub-order's failure (see the
    /// atomicity note on partial commitment).
    async fn schedule_sub_order(
        &self,
        sub_order: &SubOrderRequirement,
        order_id: &str,
        priority: u8,
        priority_map: Option<&PriorityMap>,
    ) -> Result<(String, f64), ScheduleError> {
        let types = sub_order.types();
        let mut attempt: u32 = 0;

        loop {
            let candidates = self.capability.find_capable(&types, &|id| self.resource_manager.is_online(id));
            if candidates.is_empty() {
                self.counters.no_capable_printer.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                return Err(ScheduleError::NoCapablePrinter(types.iter().map(|t| t.to_string()).collect()));
            }

            let mut ranked: Vec<(String, f64)> = Vec::new();
            let mut queue_full_printers: Vec<String> = Vec::new();
            let mut worst_resource: Option<(String, String, f64, f64)> = None;

            for id in &candidates {
                let snapshot = self.resource_manager.snapshot(id)?;
                let is_full = snapshot.queue_size >= self.config.max_queue_length;

                let printer_info = self.resource_manager.with_printer(id, |record| record.printer.clone())?;
                let sub_score = score(&printer_info, &snapshot, sub_order, &self.weights, &self.config.ink_consumption);

                if sub_score <= 0.0 {
                    if is_full {
                        queue_full_printers.push(id.clone());
                    } else if let Some(detail) = hardest_shortfall(&printer_info, &snapshot, sub_order, &self.config.ink_consumption) {
                        worst_resource = Some((id.clone(), detail.0, detail.1, detail.2));
                    }
                    continue;
                }

                ranked.push((id.clone(), sub_score));
            }

            if ranked.is_empty() {
                if !queue_full_printers.is_empty() {
                    self.counters.queue_overflows.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    return Err(ScheduleError::QueueOverflow(queue_full_printers));
                }
                if let Some((printer_id, resource, available, needed)) = worst_resource {
                    self.counters.insufficient_resource.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    return Err(ScheduleError::InsufficientResource {
                        printer_id,
                        resource,
                        available,
                        needed,
                    });
                }
                self.counters.no_capable_printer.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                return Err(ScheduleError::NoCapablePrinter(types.iter().map(|t| t.to_string()).collect()));
            }

            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| priority_index(priority_map, &a.0).cmp(&priority_index(priority_map, &b.0)))
                    .then_with(|| a.0.cmp(&b.0))
            });

            let mut hit_conflict = false;
            let mut consume_overflow_printers: Vec<String> = Vec::new();
            let mut consume_resource_failure: Option<(String, String, f64, f64)> = None;
            let mut internal_failure: Option<String> = None;

            for (printer_id, sub_score) in &ranked {
                let snapshot = match self.resource_manager.snapshot(printer_id) {
                    Ok(s) => s,
                    Err(err) => {
                        internal_failure = Some(err.to_string());
                        continue;
                    }
                };

                match self
                    .resource_manager
                    .validate_and_consume(printer_id, sub_order, &snapshot, &self.config.ink_consumption)
                {
                    Ok(()) => {
                        let job = ReservedJob {
                            order_id: order_id.to_string(),
                            sub_order: sub_order.clone(),
                            priority,
                            enqueued_at: Utc::now(),
                            enqueue_seq: 0,
                        };

                        let push_result = self
                            .resource_manager
                            .with_printer(printer_id, |record| record.queue.push(job, priority))?;

                        match push_result {
                            Ok(_) => return Ok((printer_id.clone(), *sub_score)),
                            Err(_overflow) => {
                                // Roll back the consumption we just made and try
                                // the next-best candidate instead.
                                let _ = self.resource_manager.release(printer_id, sub_order, &self.config.ink_consumption);
                                consume_overflow_printers.push(printer_id.clone());
                                continue;
                            }
                        }
                    }
                    Err(FleetError::Conflict(..)) => {
                        hit_conflict = true;
                        break;
                    }
                    Err(FleetError::InsufficientResource {
                        printer_id,
                        resource,
                        available,
                        needed,
                    }) => {
                        consume_resource_failure = Some((printer_id, resource, available, needed));
                        continue;
                    }
                    Err(err) => {
                        internal_failure = Some(err.to_string());
                        continue;
                    }
                }
            }

            if hit_conflict {
                attempt += 1;
                self.counters.conflicts.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                if attempt > self.config.max_retries {
                    return Err(ScheduleError::ResourceConflict(order_id.to_string()));
                }
                tokio::time::sleep(self.config.retry_delay * attempt).await;
                continue;
            }

            // Every ranked candidate failed at consume time without a version
            // conflict: classify by what actually went wrong rather than
            // defaulting to queue overflow. A candidate can only reach this
            // point with a positive score, so a resource shortfall here means
            // the Scorer's hard-fail check let through a low-but-positive
            // level (e.g. ink just above zero) that `validate_and_consume`'s
            // stricter availability check then rejected.
            if let Some((printer_id, resource, available, needed)) = consume_resource_failure {
                self.counters.insufficient_resource.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                return Err(ScheduleError::InsufficientResource {
                    printer_id,
                    resource,
                    available,
                    needed,
                });
            }

            if !consume_overflow_printers.is_empty() {
                self.counters.queue_overflows.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                return Err(ScheduleError::QueueOverflow(consume_overflow_printers));
            }

            if let Some(detail) = internal_failure {
                return Err(ScheduleError::SchedulerInternal(detail));
            }

            self.counters.queue_overflows.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            return Err(ScheduleError::QueueOverflow(ranked.into_iter().map(|(id, _)| id).collect()));
        }
    }

    pub fn cancel_order(&self, order_id: &str, printer_id: Option<&str>) -> bool {
        let targets = match printer_id {
            Some(id) => vec![id.to_string()],
            None => self.resource_manager.printer_ids(),
        };

        let mut cancelled_any = false;

        for id in targets {
            let removed = self.resource_manager.with_printer(&id, |record| record.queue.remove_by_order(order_id));
            if let Ok(removed) = removed {
                for job in removed {
                    let _ = self.resource_manager.release(&id, &job.sub_order, &self.config.ink_consumption);
                    cancelled_any = true;
                }
            }
        }

        if cancelled_any {
            self.cache.clear();
        }
        cancelled_any
    }

    pub fn update_resources(
        &self,
        printer_id: &str,
        paper_delta: Option<BTreeMap<corelib::PaperKind, i64>>,
        ink_delta: Option<BTreeMap<corelib::InkChannel, f64>>,
    ) -> Result<(), ScheduleError> {
        self.resource_manager.apply_manual_update(printer_id, paper_delta, ink_delta)?;
        self.cache.clear();
        Ok(())
    }

    pub fn set_online(&self, printer_id: &str, online: bool) -> Result<(), ScheduleError> {
        self.resource_manager.set_online(printer_id, online)?;
        self.capability.rebuild(&self.snapshot_printers());
        self.cache.clear();
        Ok(())
    }

    pub fn printer_status(&self, printer_id: &str) -> Result<PrinterStatusView, ScheduleError> {
        self.resource_manager
            .with_printer(printer_id, |record| {
                let health = derive_health(
                    record.printer.online,
                    &record.printer.paper_count,
                    &record.printer.ink,
                    record.queue.size(),
                    self.config.max_queue_length,
                );

                let queued_jobs = record
                    .queue
                    .ordered()
                    .into_iter()
                    .enumerate()
                    .map(|(idx, job)| crate::status::QueuedJobView {
                        order_id: job.order_id.clone(),
                        priority: job.priority,
                        types: job.sub_order.types(),
                        position: idx + 1,
                    })
                    .collect();

                PrinterStatusView {
                    id: record.printer.id.clone(),
                    supported: record.printer.supported.clone(),
                    paper_count: record.printer.paper_count.clone(),
                    ink: record.printer.ink.clone(),
                    speed: record.printer.speed,
                    queue_size: record.queue.size(),
                    queue_capacity: self.config.max_queue_length,
                    status: health,
                    metadata: record.printer.metadata.clone(),
                    queued_jobs,
                }
            })
            .map_err(Into::into)
    }

    pub fn system_status(&self) -> SystemStatus {
        let ids = self.resource_manager.printer_ids();
        let mut ready = 0usize;
        let mut total_queued = 0usize;
        let mut max_queue = 0usize;

        for id in &ids {
            if let Ok(view) = self.printer_status(id) {
                if view.status == crate::status::PrinterHealth::Ready {
                    ready += 1;
                }
                total_queued += view.queue_size;
                max_queue = max_queue.max(view.queue_size);
            }
        }

        let average = if ids.is_empty() { 0.0 } else { total_queued as f64 / ids.len() as f64 };

        let counters = self.counters.snapshot();
        let success_rate = if counters.schedules_attempted == 0 {
            100.0
        } else {
            counters.schedules_succeeded as f64 / counters.schedules_attempted as f64 * 100.0
        };

        SystemStatus {
            total_printers: ids.len(),
            ready_printers: ready,
            total_queued_jobs: total_queued,
            cache_entries: self.cache.len(),
            average_queue_length: average,
            max_queue_length_observed: max_queue,
            success_rate_percentage: success_rate,
        }
    }

    fn fleet_digest(&self) -> Vec<PrinterDigest> {
        let mut ids = self.resource_manager.printer_ids();
        ids.sort();

        ids.into_iter()
            .filter_map(|id| {
                let snapshot = self.resource_manager.snapshot(&id).ok()?;
                Some(PrinterDigest {
                    printer_id: id,
                    paper_count: snapshot.paper_count,
                    ink: snapshot.ink,
                    queue_size: snapshot.queue_size,
                })
            })
            .collect()
    }

    fn snapshot_printers(&self) -> Vec<Printer> {
        self.resource_manager
            .printer_ids()
            .into_iter()
            .filter_map(|id| self.resource_manager.with_printer(&id, |record| record.printer.clone()).ok())
            .collect()
    }
}

fn priority_index(map: Option<&PriorityMap>, printer_id: &str) -> u32 {
    map.and_then(|m| m.get(printer_id).copied()).unwrap_or(u32::MAX)
}

/// Identify the single worst resource shortfall for a hard-failed printer,
/// used to build an informative `InsufficientResource` error when every
/// capable printer hard-fails.
fn hardest_shortfall(
    printer: &Printer,
    snapshot: &corelib::ResourceSnapshot,
    sub_order: &SubOrderRequirement,
    ink_table: &InkConsumptionTable,
) -> Option<(String, f64, f64)> {
    let _ = printer;
    let need = corelib::required_consumption(sub_order, ink_table);

    for (kind, needed) in &need.paper {
        let available = *snapshot.paper_count.get(kind).unwrap_or(&0) as f64;
        if available < *needed as f64 {
            return Some((format!("paper:{kind}"), available, *needed as f64));
        }
    }

    for (channel, needed) in &need.ink {
        let available = *snapshot.ink.get(channel).unwrap_or(&0.0);
        if available <= 0.0 {
            return Some((format!("ink:{channel}"), available, *needed));
        }
    }

    None
}
