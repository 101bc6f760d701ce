//! Exercises the demo service loop end to end: submit an order through the
//! channel, let `run_service` schedule it and hand it to an execution
//! backend, and observe the reply plus the backend's own record of what it
//! was asked to do.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backend::demo_fleet::baseline_fleet;
use backend::metrics::Counters;
use backend::service::{run_service, OrderSubmission};
use corelib::{PaperKind, PrintType, RequirementMap, TypeRequirement};
use executor::{ExecutionBackend, ExecutionJob};
use scheduler::{EngineConfig, SchedulerEngine};
use tokio::sync::{mpsc, oneshot};

#[derive(Default)]
struct RecordingBackend {
    jobs: Mutex<Vec<ExecutionJob>>,
}

#[async_trait]
impl ExecutionBackend for RecordingBackend {
    async fn submit_job(&self, job: ExecutionJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

fn requirement(paper: &[(&str, u32)]) -> TypeRequirement {
    TypeRequirement {
        paper_count: paper.iter().map(|(k, v)| (PaperKind::new(*k), *v)).collect(),
    }
}

#[tokio::test]
async fn submitted_order_is_scheduled_and_forwarded_to_execution_backend() {
    let engine = Arc::new(SchedulerEngine::construct(baseline_fleet(), None, EngineConfig::default()).unwrap());
    let backend = Arc::new(RecordingBackend::default());
    let counters = Counters::default();

    let (tx, rx) = mpsc::channel::<OrderSubmission>(8);
    let service = tokio::spawn(run_service(engine, backend.clone(), counters.clone(), rx));

    let order = RequirementMap(BTreeMap::from([
        (PrintType::new("bw"), requirement(&[("A4", 10)])),
        (PrintType::new("color"), requirement(&[("A4", 5)])),
    ]));

    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(OrderSubmission {
        order,
        order_id: Some("order-1".to_string()),
        priority: 5,
        reply: Some(reply_tx),
    })
    .await
    .unwrap();

    let assignment = reply_rx.await.unwrap().expect("order should be schedulable against the baseline fleet");
    assert_eq!(assignment.order_id, "order-1");
    assert!(!assignment.assignments.is_empty());

    drop(tx);
    service.await.unwrap();

    let jobs = backend.jobs.lock().unwrap();
    assert_eq!(jobs.len(), assignment.assignments.len());
    assert!(jobs.iter().all(|j| j.job_id == "order-1"));

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.orders_submitted, 1);
    assert_eq!(snapshot.orders_scheduled, 1);
    assert_eq!(snapshot.jobs_submitted_to_backend as usize, jobs.len());
}

#[tokio::test]
async fn rejected_order_is_counted_and_not_forwarded() {
    let engine = Arc::new(SchedulerEngine::construct(baseline_fleet(), None, EngineConfig::default()).unwrap());
    let backend = Arc::new(RecordingBackend::default());
    let counters = Counters::default();

    let (tx, rx) = mpsc::channel::<OrderSubmission>(8);
    let service = tokio::spawn(run_service(engine, backend.clone(), counters.clone(), rx));

    // No printer in the baseline fleet supports this type.
    let order = RequirementMap(BTreeMap::from([(PrintType::new("engraving"), requirement(&[("A4", 1)]))]));

    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(OrderSubmission {
        order,
        order_id: Some("order-2".to_string()),
        priority: 5,
        reply: Some(reply_tx),
    })
    .await
    .unwrap();

    let result = reply_rx.await.unwrap();
    assert!(result.is_err());

    drop(tx);
    service.await.unwrap();

    assert!(backend.jobs.lock().unwrap().is_empty());
    let snapshot = counters.snapshot();
    assert_eq!(snapshot.orders_rejected, 1);
    assert_eq!(snapshot.orders_scheduled, 0);
}
