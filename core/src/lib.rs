pub mod consumption;
pub mod models;

pub use consumption::{required_consumption, Consumption, InkConsumptionTable};
pub use models::*;
