pub mod assignment_cache;
pub mod config;
pub mod counters;
pub mod error;
pub mod planner;
pub mod result;
pub mod scheduler_core;
pub mod scorer;
pub mod status;
pub mod validator;

pub use assignment_cache::{cache_key, AssignmentCache, PrinterDigest};
pub use config::EngineConfig;
pub use counters::{Counters, CountersSnapshot};
pub use error::ScheduleError;
pub use planner::plan_sub_orders;
pub use result::AssignmentResult;
pub use scheduler_core::{PriorityMap, SchedulerEngine};
pub use scorer::score;
pub use status::{derive_health, PrinterHealth, PrinterStatusView, QueuedJobView, SystemStatus};
pub use validator::{validate_fleet, validate_order, validate_weights};
