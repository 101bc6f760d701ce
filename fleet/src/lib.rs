pub mod capability;
pub mod queue;
pub mod resource_manager;

pub use capability::CapabilityIndex;
pub use queue::{BoundedQueue, QueueOverflow};
pub use resource_manager::{FleetError, PrinterRecord, ResourceManager};
