//! Best-effort memoization of `schedule_order` results, keyed by a
//! canonicalization of the order plus the scoring-relevant slice of the
//! fleet's current state. Modeled on the bounded, lock-guarded in-memory
//! cache used elsewhere in this codebase for short-lived, advisory state.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use corelib::{InkChannel, Order, PaperKind};
use parking_lot::Mutex;

use crate::result::AssignmentResult;

struct CacheEntry {
    result: AssignmentResult,
    inserted_at: Instant,
}

pub struct AssignmentCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl AssignmentCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns a cached assignment iff present and not yet expired. A hit
    /// here is advisory only: the caller must still re-validate-and-consume
    /// before treating the resources as reserved (see invariant on cache
    /// safety).
    pub fn get(&self, key: &str) -> Option<AssignmentResult> {
        let mut guard = self.entries.lock();
        match guard.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.result.clone()),
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, result: AssignmentResult) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Invalidate the entire cache. Called on any manual resource update:
    /// coarse, but correct, and cheap given the cache's short TTL.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// One printer's scoring-relevant state, used to build a fleet digest for
/// the cache key. Non-behavioral fields (metadata, firmware, ...) are left
/// out on purpose so changes to them don't invalidate cached plans.
pub struct PrinterDigest {
    pub printer_id: String,
    pub paper_count: BTreeMap<PaperKind, u32>,
    pub ink: BTreeMap<InkChannel, f64>,
    pub queue_size: usize,
}

/// Build a stable string key from an order and the fleet digest. Floats are
/// formatted to a fixed precision so the key doesn't depend on incidental
/// binary representation differences.
pub fn cache_key(order: &Order, digest: &[PrinterDigest]) -> String {
    let order_json = serde_json::to_string(order).unwrap_or_default();

    let mut parts = Vec::with_capacity(digest.len());
    for p in digest {
        let paper: Vec<String> = p.paper_count.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let ink: Vec<String> = p.ink.iter().map(|(k, v)| format!("{k}={v:.4}")).collect();
        parts.push(format!("{}:[{}][{}]:{}", p.printer_id, paper.join(","), ink.join(","), p.queue_size));
    }

    format!("{order_json}|{}", parts.join(";"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap as Map;

    fn sample_order() -> Order {
        Order::default()
    }

    fn sample_result() -> AssignmentResult {
        AssignmentResult {
            order_id: "o1".into(),
            assignments: vec!["p1".into()],
            scores: vec![0.9],
            sub_orders: vec![vec!["bw".into()]],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn hit_before_ttl_and_miss_after() {
        let cache = AssignmentCache::new(Duration::from_millis(20));
        cache.insert("k".into(), sample_result());

        assert!(cache.get("k").is_some());
        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn clear_empties_all_entries() {
        let cache = AssignmentCache::new(Duration::from_secs(60));
        cache.insert("k".into(), sample_result());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn key_is_stable_for_identical_inputs() {
        let order = sample_order();
        let digest = vec![PrinterDigest {
            printer_id: "p1".into(),
            paper_count: Map::from([(PaperKind::new("A4"), 10)]),
            ink: Map::from([(InkChannel::new("black"), 50.0)]),
            queue_size: 0,
        }];

        assert_eq!(cache_key(&order, &digest), cache_key(&order, &digest));
    }

    #[test]
    fn key_changes_with_fleet_state() {
        let order = sample_order();
        let digest_a = vec![PrinterDigest {
            printer_id: "p1".into(),
            paper_count: Map::from([(PaperKind::new("A4"), 10)]),
            ink: Map::from([(InkChannel::new("black"), 50.0)]),
            queue_size: 0,
        }];
        let digest_b = vec![PrinterDigest {
            printer_id: "p1".into(),
            paper_count: Map::from([(PaperKind::new("A4"), 9)]),
            ink: Map::from([(InkChannel::new("black"), 50.0)]),
            queue_size: 0,
        }];

        assert_ne!(cache_key(&order, &digest_a), cache_key(&order, &digest_b));
    }
}
