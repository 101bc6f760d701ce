use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use corelib::ReservedJob;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("queue is full")]
pub struct QueueOverflow;

/// Min-heap key: lower priority value is served first; ties broken by
/// earlier enqueue sequence (FIFO within a priority).
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeapKey {
    priority: u8,
    seq: u64,
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority).then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: HeapKey,
    job: ReservedJob,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A bounded, priority-ordered queue of reserved jobs for a single printer.
///
/// Backed by a `BinaryHeap<Reverse<Entry>>` keyed on `(priority, seq)` so the
/// heap's max-first pop surfaces the smallest key, i.e. the highest-priority,
/// earliest-enqueued job.
#[derive(Debug, Default)]
pub struct BoundedQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    capacity: usize,
    next_seq: u64,
}

impl BoundedQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity,
            next_seq: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn push(&mut self, mut job: ReservedJob, priority: u8) -> Result<u64, QueueOverflow> {
        if self.is_full() {
            return Err(QueueOverflow);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        job.enqueue_seq = seq;

        self.heap.push(Reverse(Entry {
            key: HeapKey { priority, seq },
            job,
        }));

        Ok(seq)
    }

    pub fn pop(&mut self) -> Option<ReservedJob> {
        self.heap.pop().map(|Reverse(entry)| entry.job)
    }

    pub fn peek(&self) -> Option<&ReservedJob> {
        self.heap.peek().map(|Reverse(entry)| &entry.job)
    }

    /// Every queued job in the order it would be popped, without consuming
    /// the queue. Position 0 is the job `peek`/`pop` would return next.
    pub fn ordered(&self) -> Vec<&ReservedJob> {
        let mut entries: Vec<&Entry> = self.heap.iter().map(|Reverse(entry)| entry).collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries.into_iter().map(|entry| &entry.job).collect()
    }

    /// Remove every queued job belonging to `order_id`. Used by cancellation;
    /// rebuilds the heap from the surviving entries (linear scan, bounded by
    /// `MAX_QUEUE_LENGTH`).
    pub fn remove_by_order(&mut self, order_id: &str) -> Vec<ReservedJob> {
        let mut removed = Vec::new();
        let mut remaining = BinaryHeap::with_capacity(self.heap.len());

        for Reverse(entry) in self.heap.drain() {
            if entry.job.order_id == order_id {
                removed.push(entry.job);
            } else {
                remaining.push(Reverse(entry));
            }
        }

        self.heap = remaining;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use corelib::SubOrderRequirement;

    fn job(order_id: &str) -> ReservedJob {
        ReservedJob {
            order_id: order_id.to_string(),
            sub_order: SubOrderRequirement::default(),
            priority: 5,
            enqueued_at: Utc::now(),
            enqueue_seq: 0,
        }
    }

    #[test]
    fn push_beyond_capacity_overflows() {
        let mut q = BoundedQueue::new(2);
        q.push(job("a"), 5).unwrap();
        q.push(job("b"), 5).unwrap();
        assert!(q.is_full());
        assert_eq!(q.push(job("c"), 5), Err(QueueOverflow));
    }

    #[test]
    fn pops_lowest_priority_value_first() {
        let mut q = BoundedQueue::new(10);
        q.push(job("low-pri"), 8).unwrap();
        q.push(job("high-pri"), 1).unwrap();
        q.push(job("mid-pri"), 5).unwrap();

        assert_eq!(q.pop().unwrap().order_id, "high-pri");
        assert_eq!(q.pop().unwrap().order_id, "mid-pri");
        assert_eq!(q.pop().unwrap().order_id, "low-pri");
        assert!(q.pop().is_none());
    }

    #[test]
    fn ties_broken_by_enqueue_order() {
        let mut q = BoundedQueue::new(10);
        q.push(job("first"), 5).unwrap();
        q.push(job("second"), 5).unwrap();

        assert_eq!(q.pop().unwrap().order_id, "first");
        assert_eq!(q.pop().unwrap().order_id, "second");
    }

    #[test]
    fn remove_by_order_returns_matches_and_keeps_rest() {
        let mut q = BoundedQueue::new(10);
        q.push(job("keep"), 5).unwrap();
        q.push(job("drop"), 3).unwrap();
        q.push(job("drop"), 9).unwrap();

        let removed = q.remove_by_order("drop");
        assert_eq!(removed.len(), 2);
        assert_eq!(q.size(), 1);
        assert_eq!(q.pop().unwrap().order_id, "keep");
    }

    #[test]
    fn ordered_reflects_pop_order_without_draining() {
        let mut q = BoundedQueue::new(10);
        q.push(job("low-pri"), 8).unwrap();
        q.push(job("high-pri"), 1).unwrap();
        q.push(job("mid-pri"), 5).unwrap();

        let order_ids: Vec<&str> = q.ordered().iter().map(|j| j.order_id.as_str()).collect();
        assert_eq!(order_ids, vec!["high-pri", "mid-pri", "low-pri"]);
        assert_eq!(q.size(), 3, "ordered() must not consume the queue");
    }

    #[test]
    fn exact_capacity_boundary() {
        let mut q = BoundedQueue::new(1);
        q.push(job("only"), 5).unwrap();
        assert!(q.is_full());
        assert_eq!(q.push(job("overflow"), 5), Err(QueueOverflow));
    }

    proptest::proptest! {
        /// Pushing an arbitrary number of jobs at arbitrary priorities never
        /// lets the queue's size exceed its configured capacity, and `ordered()`
        /// always reports exactly as many jobs as `size()`.
        #[test]
        fn queue_never_exceeds_capacity(
            capacity in 1usize..20,
            priorities in proptest::collection::vec(0u8..10, 0..40),
        ) {
            let mut q = BoundedQueue::new(capacity);
            let mut accepted = 0usize;

            for p in priorities {
                match q.push(job("j"), p) {
                    Ok(_) => accepted += 1,
                    Err(QueueOverflow) => {}
                }
                proptest::prop_assert!(q.size() <= capacity);
            }

            proptest::prop_assert_eq!(q.size(), accepted);
            proptest::prop_assert_eq!(q.ordered().len(), accepted);
        }
    }
}
