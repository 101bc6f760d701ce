use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The assignment result shape returned across the engine's external
/// contract: parallel arrays indexed the same way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentResult {
    pub order_id: String,
    pub assignments: Vec<String>,
    pub scores: Vec<f64>,
    pub sub_orders: Vec<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}
