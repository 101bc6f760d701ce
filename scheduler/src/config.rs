use std::time::Duration;

use corelib::{InkConsumptionTable, Weights};

/// Tunable knobs for the scheduling engine. Every field has a documented
/// default; `from_env` lets a deployment override them without a rebuild.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard cap on a single printer's queue. A push beyond this fails with
    /// `QueueOverflow` rather than growing unbounded.
    pub max_queue_length: usize,

    /// How many times `schedule_order` retries a sub-order after a version
    /// conflict before giving up with `ResourceConflict`. Set to 0 to
    /// disable retries entirely (first conflict is terminal).
    pub max_retries: u32,

    /// Base backoff between conflict retries. Attempt `k` waits
    /// `k * retry_delay`, so total worst-case delay grows quadratically in
    /// `max_retries`; keep both small for an interactive scheduler.
    pub retry_delay: Duration,

    /// Upper bound on how long a single printer-lock acquisition may take
    /// before the engine gives up and reports `SchedulerInternal`. Printer
    /// locks are held only for short, non-blocking critical sections, so in
    /// practice this should never be approached.
    pub lock_timeout: Duration,

    /// Time-to-live for assignment cache entries. A short TTL keeps stale
    /// plans from being served after the fleet has moved on, while still
    /// absorbing bursts of identical orders.
    pub cache_ttl: Duration,

    /// Default weight vector handed to the Scorer when a caller does not
    /// supply its own.
    pub default_weights: Weights,

    /// Ink percentage consumed per page, by print type and channel.
    pub ink_consumption: InkConsumptionTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queue_length: 10,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            lock_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
            default_weights: Weights::default(),
            ink_consumption: InkConsumptionTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load overrides from the environment, falling back to documented
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("MAX_QUEUE_LENGTH") {
            if let Ok(v) = v.parse() {
                cfg.max_queue_length = v;
            }
        }
        if let Ok(v) = std::env::var("MAX_RETRIES") {
            if let Ok(v) = v.parse() {
                cfg.max_retries = v;
            }
        }
        if let Ok(v) = std::env::var("RETRY_DELAY_MS") {
            if let Ok(v) = v.parse() {
                cfg.retry_delay = Duration::from_millis(v);
            }
        }
        if let Ok(v) = std::env::var("LOCK_TIMEOUT_MS") {
            if let Ok(v) = v.parse() {
                cfg.lock_timeout = Duration::from_millis(v);
            }
        }
        if let Ok(v) = std::env::var("CACHE_TTL_SECS") {
            if let Ok(v) = v.parse() {
                cfg.cache_ttl = Duration::from_secs(v);
            }
        }

        cfg
    }
}
