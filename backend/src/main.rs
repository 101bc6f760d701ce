use std::collections::BTreeMap;
use std::sync::Arc;

use backend::demo_executor::LoggingExecutionBackend;
use backend::demo_fleet::baseline_fleet;
use backend::metrics::Counters;
use backend::service::{run_service, OrderSubmission};
use backend::AppConfig;
use corelib::{PaperKind, PrintType, RequirementMap, TypeRequirement};
use scheduler::SchedulerEngine;
use tokio::sync::{mpsc, oneshot};

fn requirement(paper: &[(&str, u32)]) -> TypeRequirement {
    TypeRequirement {
        paper_count: paper.iter().map(|(k, v)| (PaperKind::new(*k), *v)).collect(),
    }
}

/// Builds the engine from the demo fleet. A real deployment would load the
/// fleet definition (and any weight override) from wherever the façade
/// persists it; this binary exists to exercise the engine end to end, not
/// to own fleet persistence.
fn build_engine(cfg: &AppConfig) -> anyhow::Result<SchedulerEngine> {
    SchedulerEngine::construct(baseline_fleet(), None, cfg.engine.clone()).map_err(|e| anyhow::anyhow!(e))
}

/// Submits the handful of orders used as this repo's seed scenarios,
/// purely to show the service loop moving an order from submission through
/// to the execution backend.
async fn submit_demo_orders(tx: &mpsc::Sender<OrderSubmission>) -> anyhow::Result<()> {
    let orders = vec![
        RequirementMap(BTreeMap::from([
            (PrintType::new("bw"), requirement(&[("A4", 10)])),
            (PrintType::new("color"), requirement(&[("A4", 5)])),
        ])),
        RequirementMap(BTreeMap::from([
            (PrintType::new("bw"), requirement(&[("A4", 50)])),
            (PrintType::new("color"), requirement(&[("A4", 20)])),
            (PrintType::new("glossy"), requirement(&[("Glossy", 10)])),
            (PrintType::new("postersize"), requirement(&[("Poster", 2)])),
        ])),
    ];

    for order in orders {
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(OrderSubmission {
            order,
            order_id: None,
            priority: 5,
            reply: Some(reply_tx),
        })
        .await
        .map_err(|_| anyhow::anyhow!("order service loop is no longer accepting submissions"))?;

        match reply_rx.await {
            Ok(Ok(assignment)) => tracing::info!(order_id = %assignment.order_id, assignments = ?assignment.assignments, "demo order scheduled"),
            Ok(Err(err)) => tracing::warn!(error = ?err, "demo order rejected"),
            Err(_) => tracing::warn!("service loop dropped the reply channel before responding"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logger("printfleet-backend");
    tracing::info!("starting printer scheduling demo service");

    let cfg = AppConfig::from_env();
    let engine = Arc::new(build_engine(&cfg)?);
    let execution_backend = Arc::new(LoggingExecutionBackend);
    let counters = Counters::default();

    let (order_tx, order_rx) = mpsc::channel::<OrderSubmission>(cfg.order_queue_capacity);

    tokio::spawn(run_service(engine.clone(), execution_backend, counters.clone(), order_rx));

    submit_demo_orders(&order_tx).await?;

    let snapshot = counters.snapshot();
    tracing::info!(
        orders_submitted = snapshot.orders_submitted,
        orders_scheduled = snapshot.orders_scheduled,
        orders_rejected = snapshot.orders_rejected,
        "demo orders submitted; waiting for shutdown signal"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    Ok(())
}
