use async_trait::async_trait;
use executor::{ExecutionBackend, ExecutionJob};
use tracing::info;

/// Stand-in execution backend for the demo binary: logs the job it would
/// have submitted to real printer hardware and returns immediately. A real
/// deployment swaps this for whatever speaks to the printer fleet's actual
/// firmware/RPC layer; the engine and service loop are unaffected either
/// way, since both only ever depend on the `ExecutionBackend` trait.
pub struct LoggingExecutionBackend;

#[async_trait]
impl ExecutionBackend for LoggingExecutionBackend {
    async fn submit_job(&self, job: ExecutionJob) -> anyhow::Result<()> {
        info!(
            job_id = %job.job_id,
            printer_id = %job.printer_id,
            types = ?job.sub_order.types(),
            "submitted job to execution backend"
        );
        Ok(())
    }
}
