use serde::{Deserialize, Serialize};

/// Weight vector for the five scoring factors. Must sum to 1.0 (within a
/// small tolerance) and each weight must lie in `[0, 1]`; range checks live
/// with the rest of the Validator in the `scheduler` crate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Weights {
    pub paper: f64,
    pub ink: f64,
    pub speed: f64,
    pub queue: f64,
    pub extras: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            paper: 0.35,
            ink: 0.30,
            speed: 0.15,
            queue: 0.15,
            extras: 0.05,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.paper + self.ink + self.speed + self.queue + self.extras
    }
}
