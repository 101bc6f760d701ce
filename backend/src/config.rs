use scheduler::EngineConfig;

/// Top-level configuration for the demo service binary: the scheduling
/// engine's own knobs (spec §6) plus the handful of settings that belong to
/// this binary's in-process order/execution wiring rather than to the
/// engine itself.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// The engine's documented configuration (queue caps, retry policy,
    /// lock timeout, cache TTL, default weights, ink consumption table).
    pub engine: EngineConfig,

    /// Capacity of the channel carrying incoming order submissions into
    /// the scheduling loop.
    ///
    /// Purpose:
    /// - bound how many orders can queue up ahead of the scheduler
    /// - a submitter naturally blocks once this many are outstanding,
    ///   rather than growing memory unboundedly
    pub order_queue_capacity: usize,

    /// Capacity of the channel carrying successful assignments on to the
    /// execution backend, one sub-order job at a time.
    ///
    /// Purpose:
    /// - if the execution backend slows down, submission naturally blocks
    /// - mirrors the engine's own per-printer queue cap in spirit, just at
    ///   the process boundary instead of per-printer
    pub execution_queue_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            engine: EngineConfig::from_env(),
            order_queue_capacity: std::env::var("ORDER_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            execution_queue_capacity: std::env::var("EXECUTION_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        }
    }
}
