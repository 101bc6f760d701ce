use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tag::{PaperKind, PrintType};

/// Paper requirement for one print type within an order or sub-order.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TypeRequirement {
    pub paper_count: BTreeMap<PaperKind, u32>,
}

impl TypeRequirement {
    pub fn total_pages(&self) -> u64 {
        self.paper_count.values().map(|&c| c as u64).sum()
    }
}

/// A mapping of print type to its requirement. An `Order` and a
/// `SubOrderRequirement` share this shape: a sub-order is a disjoint
/// restriction of an order's keys to the types one printer will handle.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RequirementMap(pub BTreeMap<PrintType, TypeRequirement>);

impl RequirementMap {
    pub fn types(&self) -> BTreeSet<PrintType> {
        self.0.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, ptype: &PrintType) -> Option<&TypeRequirement> {
        self.0.get(ptype)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PrintType, &TypeRequirement)> {
        self.0.iter()
    }

    /// Restrict this map to a subset of print types, keeping only matching
    /// entries. Used by the planner to carve a sub-order out of an order.
    pub fn restrict(&self, types: &BTreeSet<PrintType>) -> RequirementMap {
        RequirementMap(
            self.0
                .iter()
                .filter(|(k, _)| types.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

pub type Order = RequirementMap;
pub type SubOrderRequirement = RequirementMap;

/// A unit of reserved work sitting in a printer's queue, owned by that
/// printer until an external execution backend consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservedJob {
    pub order_id: String,
    pub sub_order: SubOrderRequirement,
    pub priority: u8,
    pub enqueued_at: DateTime<Utc>,
    pub enqueue_seq: u64,
}
