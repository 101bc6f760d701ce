//! Schema and range checks for orders, fleet definitions, and weight
//! vectors. Deliberately pure: no locks, no I/O, just sequential checks
//! that return on the first violation.

use corelib::{Order, Printer, Weights};

use crate::error::ScheduleError;

const MAX_TYPES_PER_ORDER: usize = 10;
const MAX_PAPER_COUNT: u32 = 10_000;
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

pub fn validate_order(order: &Order) -> Result<(), ScheduleError> {
    if order.is_empty() {
        return Err(ScheduleError::ValidationError("order must have at least one print type".into()));
    }

    if order.len() > MAX_TYPES_PER_ORDER {
        return Err(ScheduleError::ValidationError(format!(
            "order has {} print types, exceeds the maximum of {MAX_TYPES_PER_ORDER}",
            order.len()
        )));
    }

    for (ptype, requirement) in order.iter() {
        if ptype.as_str().trim().is_empty() {
            return Err(ScheduleError::ValidationError("print type must not be blank".into()));
        }
        if !ptype.as_str().chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ScheduleError::ValidationError(format!("print type '{ptype}' must be alphanumeric")));
        }

        if requirement.paper_count.is_empty() {
            return Err(ScheduleError::ValidationError(format!("print type '{ptype}' has no paper_count entries")));
        }

        for (kind, count) in &requirement.paper_count {
            if *count == 0 {
                return Err(ScheduleError::ValidationError(format!(
                    "paper_count for '{kind}' under '{ptype}' must be positive"
                )));
            }
            if *count > MAX_PAPER_COUNT {
                return Err(ScheduleError::ValidationError(format!(
                    "paper_count for '{kind}' under '{ptype}' exceeds the maximum of {MAX_PAPER_COUNT}"
                )));
            }
        }
    }

    Ok(())
}

pub fn validate_fleet(fleet: &[Printer]) -> Result<(), ScheduleError> {
    if fleet.is_empty() {
        return Err(ScheduleError::ValidationError("fleet must contain at least one printer".into()));
    }

    for printer in fleet {
        if printer.id.trim().is_empty() {
            return Err(ScheduleError::ValidationError("printer id must not be blank".into()));
        }

        for (channel, pct) in &printer.ink {
            if !(0.0..=100.0).contains(pct) {
                return Err(ScheduleError::ValidationError(format!(
                    "printer '{}' ink channel '{channel}' must be in [0, 100], got {pct}",
                    printer.id
                )));
            }
        }

        if printer.speed < 0.0 {
            return Err(ScheduleError::ValidationError(format!("printer '{}' speed must be non-negative", printer.id)));
        }
    }

    Ok(())
}

pub fn validate_weights(weights: &Weights) -> Result<(), ScheduleError> {
    for (name, value) in [
        ("paper", weights.paper),
        ("ink", weights.ink),
        ("speed", weights.speed),
        ("queue", weights.queue),
        ("extras", weights.extras),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ScheduleError::ValidationError(format!("weight '{name}' must be in [0, 1], got {value}")));
        }
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ScheduleError::ValidationError(format!("weights must sum to 1.0 (+/- {WEIGHT_SUM_TOLERANCE}), got {sum}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{PaperKind, PrintType, RequirementMap, TypeRequirement};
    use std::collections::BTreeMap;

    fn order_with(ptype: &str, kind: &str, count: u32) -> Order {
        let mut map = BTreeMap::new();
        map.insert(
            PrintType::new(ptype),
            TypeRequirement {
                paper_count: [(PaperKind::new(kind), count)].into_iter().collect(),
            },
        );
        RequirementMap(map)
    }

    #[test]
    fn empty_order_rejected() {
        let order = RequirementMap(BTreeMap::new());
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn zero_paper_count_rejected() {
        let order = order_with("bw", "A4", 0);
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn paper_count_over_max_rejected() {
        let order = order_with("bw", "A4", 20_000);
        assert!(validate_order(&order).is_err());
    }

    #[test]
    fn too_many_types_rejected() {
        let mut map = BTreeMap::new();
        for i in 0..11 {
            map.insert(
                PrintType::new(format!("t{i}")),
                TypeRequirement {
                    paper_count: [(PaperKind::new("A4"), 1)].into_iter().collect(),
                },
            );
        }
        assert!(validate_order(&RequirementMap(map)).is_err());
    }

    #[test]
    fn valid_order_passes() {
        let order = order_with("bw", "A4", 10);
        assert!(validate_order(&order).is_ok());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let weights = Weights {
            paper: 0.5,
            ink: 0.5,
            speed: 0.5,
            queue: 0.0,
            extras: 0.0,
        };
        assert!(validate_weights(&weights).is_err());
    }

    #[test]
    fn default_weights_pass() {
        assert!(validate_weights(&Weights::default()).is_ok());
    }

    #[test]
    fn ink_out_of_range_rejected() {
        let printer = Printer {
            id: "p1".into(),
            supported: Default::default(),
            paper_count: Default::default(),
            ink: [(corelib::InkChannel::new("black"), 150.0)].into_iter().collect(),
            speed: 10.0,
            online: true,
            metadata: Default::default(),
        };
        assert!(validate_fleet(&[printer]).is_err());
    }
}
