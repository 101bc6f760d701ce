use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{InkChannel, PaperKind, PrintType, SubOrderRequirement};

/// Ink percentage consumed per page, by print type and channel. Configured
/// data, not hard-wired: callers may override the whole table (the default
/// mirrors the scheduling engine's documented consumption model).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct InkConsumptionTable(pub BTreeMap<PrintType, BTreeMap<InkChannel, f64>>);

impl Default for InkConsumptionTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(
            PrintType::new(PrintType::BW),
            [(InkChannel::new(InkChannel::BLACK), 0.5)].into_iter().collect(),
        );
        table.insert(
            PrintType::new(PrintType::COLOR),
            [
                (InkChannel::new(InkChannel::CYAN), 0.3),
                (InkChannel::new(InkChannel::MAGENTA), 0.3),
                (InkChannel::new(InkChannel::YELLOW), 0.3),
                (InkChannel::new(InkChannel::BLACK), 0.1),
            ]
            .into_iter()
            .collect(),
        );
        table.insert(
            PrintType::new(PrintType::GLOSSY),
            [
                (InkChannel::new(InkChannel::CYAN), 0.5),
                (InkChannel::new(InkChannel::MAGENTA), 0.5),
                (InkChannel::new(InkChannel::YELLOW), 0.5),
                (InkChannel::new(InkChannel::BLACK), 0.2),
            ]
            .into_iter()
            .collect(),
        );
        table.insert(
            PrintType::new(PrintType::THICK),
            [
                (InkChannel::new(InkChannel::CYAN), 0.45),
                (InkChannel::new(InkChannel::MAGENTA), 0.45),
                (InkChannel::new(InkChannel::YELLOW), 0.45),
                (InkChannel::new(InkChannel::BLACK), 0.15),
            ]
            .into_iter()
            .collect(),
        );
        table.insert(
            PrintType::new(PrintType::POSTERSIZE),
            [
                (InkChannel::new(InkChannel::CYAN), 0.8),
                (InkChannel::new(InkChannel::MAGENTA), 0.8),
                (InkChannel::new(InkChannel::YELLOW), 0.8),
                (InkChannel::new(InkChannel::BLACK), 0.5),
            ]
            .into_iter()
            .collect(),
        );
        Self(table)
    }
}

impl InkConsumptionTable {
    pub fn channels_for(&self, ptype: &PrintType) -> impl Iterator<Item = &InkChannel> {
        self.0.get(ptype).into_iter().flat_map(|m| m.keys())
    }
}

/// Paper and ink required to fulfill a sub-order, derived from the ink
/// consumption table. Shared by the Resource Manager (to actually subtract
/// it) and the Scorer (to predict whether a printer can afford it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Consumption {
    pub paper: BTreeMap<PaperKind, u32>,
    pub ink: BTreeMap<InkChannel, f64>,
}

pub fn required_consumption(sub_order: &SubOrderRequirement, ink_table: &InkConsumptionTable) -> Consumption {
    let mut paper: BTreeMap<PaperKind, u32> = BTreeMap::new();
    let mut ink: BTreeMap<InkChannel, f64> = BTreeMap::new();

    for (ptype, requirement) in sub_order.iter() {
        for (kind, count) in &requirement.paper_count {
            *paper.entry(kind.clone()).or_insert(0) += count;
        }

        let pages = requirement.total_pages() as f64;
        if let Some(per_page) = ink_table.0.get(ptype) {
            for (channel, pct_per_page) in per_page {
                *ink.entry(channel.clone()).or_insert(0.0) += pct_per_page * pages;
            }
        }
    }

    Consumption { paper, ink }
}
