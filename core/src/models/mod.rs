mod order;
mod printer;
mod tag;
mod weights;

pub use order::{Order, ReservedJob, RequirementMap, SubOrderRequirement, TypeRequirement};
pub use printer::{Printer, PrinterMetadata, ResourceSnapshot};
pub use tag::{InkChannel, PaperKind, PrintType};
pub use weights::Weights;

/// A fleet is just a named collection of printers; the live, lockable fleet
/// state lives in the `fleet` crate, not here.
pub type FleetSpec = Vec<Printer>;
