//! Greedy set-cover decomposition of an order into sub-orders, each fully
//! supported by at least one printer in the fleet.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use corelib::{Order, PrintType, SubOrderRequirement};
use fleet::CapabilityIndex;

use crate::error::ScheduleError;

/// Enumerate every non-empty subset of `types` that at least one (online)
/// printer fully supports, keeping the same subset whether or not it ends
/// up chosen by the greedy pass below. `|types|` is bounded by the
/// Validator (at most 10), so brute-force enumeration of the 2^n subsets is
/// cheap.
fn capable_candidates(
    types: &[PrintType],
    capability: &CapabilityIndex,
    online: &dyn Fn(&str) -> bool,
) -> Vec<BTreeSet<PrintType>> {
    let n = types.len();
    let mut candidates = Vec::new();

    for mask in 1..(1u32 << n) {
        let subset: BTreeSet<PrintType> = (0..n).filter(|i| mask & (1 << i) != 0).map(|i| types[i].clone()).collect();

        if !capability.find_capable(&subset, online).is_empty() {
            candidates.push(subset);
        }
    }

    candidates
}

pub fn plan_sub_orders(
    order: &Order,
    capability: &CapabilityIndex,
    online: &dyn Fn(&str) -> bool,
) -> Result<Vec<SubOrderRequirement>, ScheduleError> {
    let mut remaining: BTreeSet<PrintType> = order.types();
    if remaining.is_empty() {
        return Ok(Vec::new());
    }

    let types: Vec<PrintType> = remaining.iter().cloned().collect();
    let candidates = capable_candidates(&types, capability, &online);

    let mut sub_orders = Vec::new();

    while !remaining.is_empty() {
        let best = candidates
            .iter()
            .filter(|s| !s.is_disjoint(&remaining))
            .max_by_key(|s| {
                let overlap = s.intersection(&remaining).count();
                let tags: Vec<&str> = s.iter().map(|t| t.as_str()).collect();
                (overlap, s.len(), Reverse(tags))
            });

        let Some(chosen) = best else {
            let missing: Vec<String> = remaining.iter().map(|t| t.to_string()).collect();
            return Err(ScheduleError::NoCapablePrinter(missing));
        };

        let covered: BTreeSet<PrintType> = chosen.intersection(&remaining).cloned().collect();
        sub_orders.push(order.restrict(&covered));

        for t in &covered {
            remaining.remove(t);
        }
    }

    Ok(sub_orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::{PaperKind, Printer, RequirementMap, TypeRequirement};
    use std::collections::BTreeMap;

    fn printer(id: &str, types: &[&str]) -> Printer {
        Printer {
            id: id.to_string(),
            supported: types.iter().map(|t| PrintType::new(*t)).collect(),
            paper_count: BTreeMap::new(),
            ink: BTreeMap::new(),
            speed: 10.0,
            online: true,
            metadata: Default::default(),
        }
    }

    fn order_of(types: &[&str]) -> Order {
        let mut map = BTreeMap::new();
        for t in types {
            map.insert(
                PrintType::new(*t),
                TypeRequirement {
                    paper_count: [(PaperKind::new("A4"), 1)].into_iter().collect(),
                },
            );
        }
        RequirementMap(map)
    }

    #[test]
    fn single_printer_covers_whole_order() {
        let fleet = vec![printer("p1", &["bw", "color"])];
        let index = CapabilityIndex::build(&fleet);
        let order = order_of(&["bw", "color"]);

        let subs = plan_sub_orders(&order, &index, &|_| true).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].types(), order.types());
    }

    #[test]
    fn disjoint_capabilities_force_decomposition() {
        let fleet = vec![printer("p1", &["bw"]), printer("p2", &["postersize"])];
        let index = CapabilityIndex::build(&fleet);
        let order = order_of(&["bw", "postersize"]);

        let subs = plan_sub_orders(&order, &index, &|_| true).unwrap();
        assert_eq!(subs.len(), 2);

        let mut covered = BTreeSet::new();
        for s in &subs {
            covered.extend(s.types());
        }
        assert_eq!(covered, order.types());
    }

    #[test]
    fn no_capable_printer_for_any_subset_fails() {
        let fleet = vec![printer("p1", &["bw"])];
        let index = CapabilityIndex::build(&fleet);
        let order = order_of(&["holographic"]);

        let err = plan_sub_orders(&order, &index, &|_| true).unwrap_err();
        assert!(matches!(err, ScheduleError::NoCapablePrinter(_)));
    }

    #[test]
    fn prefers_maximum_coverage_subset() {
        let fleet = vec![
            printer("p1", &["bw", "color", "glossy"]),
            printer("p2", &["bw"]),
        ];
        let index = CapabilityIndex::build(&fleet);
        let order = order_of(&["bw", "color", "glossy"]);

        let subs = plan_sub_orders(&order, &index, &|_| true).unwrap();
        assert_eq!(subs.len(), 1, "one printer covers everything, greedy should not over-split");
    }
}
