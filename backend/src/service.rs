//! The demo binary's in-process order/execution loop: a channel carries
//! order submissions in, the engine schedules them, and successful
//! assignments are handed one sub-order at a time to an `ExecutionBackend`.
//! This is a stand-in for the HTTP façade the engine treats as an external
//! collaborator — just enough wiring to drive the engine end to end from a
//! single process.

use std::sync::Arc;

use corelib::{Order, PrintType};
use executor::{ExecutionBackend, ExecutionJob};
use scheduler::{AssignmentResult, ScheduleError, SchedulerEngine};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument};

use crate::metrics::Counters;

/// One order handed to the service loop, with an optional channel the
/// submitter can use to learn the outcome.
pub struct OrderSubmission {
    pub order: Order,
    pub order_id: Option<String>,
    pub priority: u8,
    pub reply: Option<oneshot::Sender<Result<AssignmentResult, ScheduleError>>>,
}

/// Runs the service loop until `rx` is closed. Spawned as a background
/// task by `main`; never panics on a single bad order, since one caller's
/// mistake should not take down the whole process.
pub async fn run_service(
    engine: Arc<SchedulerEngine>,
    execution_backend: Arc<dyn ExecutionBackend>,
    counters: Counters,
    mut rx: mpsc::Receiver<OrderSubmission>,
) {
    info!(component = "service", event = "startup", "order service loop started");

    while let Some(submission) = rx.recv().await {
        counters.orders_submitted.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        // Kept so a successful assignment's sub-orders can be rebuilt by
        // type afterward; the engine itself only returns type names (spec
        // §6's assignment result shape), not the full requirement.
        let original_order = submission.order.clone();

        let result = engine
            .schedule_order(submission.order, submission.order_id, submission.priority, None)
            .await;

        match &result {
            Ok(assignment) => {
                counters.orders_scheduled.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                submit_jobs(execution_backend.as_ref(), &original_order, assignment, &counters).await;
            }
            Err(err) => {
                counters.orders_rejected.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                error!(error = ?err, "order rejected by scheduling engine");
            }
        }

        if let Some(reply) = submission.reply {
            let _ = reply.send(result);
        }
    }

    info!(component = "service", event = "shutdown", "order service loop exiting");
}

/// Hands each assigned sub-order to the execution backend as its own job,
/// rebuilding the sub-order's requirement by restricting the original
/// order to the print types that landed on each printer.
#[instrument(skip(execution_backend, original_order, assignment, counters), fields(order_id = %assignment.order_id))]
async fn submit_jobs(execution_backend: &dyn ExecutionBackend, original_order: &Order, assignment: &AssignmentResult, counters: &Counters) {
    for (printer_id, types) in assignment.assignments.iter().zip(&assignment.sub_orders) {
        let type_set = types.iter().map(|t| PrintType::new(t.as_str())).collect();
        let sub_order = original_order.restrict(&type_set);

        let job = ExecutionJob {
            job_id: assignment.order_id.clone(),
            printer_id: printer_id.clone(),
            sub_order,
        };

        counters.jobs_submitted_to_backend.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if let Err(err) = execution_backend.submit_job(job).await {
            counters.jobs_failed.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            error!(error = ?err, printer_id = %printer_id, "execution backend rejected job");
        }
    }
}
