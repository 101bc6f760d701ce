pub mod config;
pub mod demo_executor;
pub mod demo_fleet;
pub mod error;
pub mod metrics;
pub mod service;

pub use config::AppConfig;
pub use error::AppError;
pub use service::OrderSubmission;
