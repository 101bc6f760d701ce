//! Pure, side-effect-free scoring of a printer against a sub-order
//! requirement. No locks, no I/O: this module only reads the snapshot and
//! weight vector handed to it.

use std::collections::BTreeSet;

use corelib::{required_consumption, InkChannel, InkConsumptionTable, Printer, ResourceSnapshot, SubOrderRequirement, Weights};

/// Score a printer for a sub-order, in `[0, 1]`. Returns `0.0` the moment
/// any required paper kind or ink channel cannot be satisfied at all
/// (hard-fail short-circuit) rather than letting a partial shortfall still
/// contribute a small positive score.
pub fn score(
    printer: &Printer,
    snapshot: &ResourceSnapshot,
    sub_order: &SubOrderRequirement,
    weights: &Weights,
    ink_table: &InkConsumptionTable,
) -> f64 {
    let need = required_consumption(sub_order, ink_table);

    let paper_score = match paper_factor(&need.paper, snapshot) {
        Some(s) => s,
        None => return 0.0,
    };

    let ink_score = match ink_factor(sub_order, snapshot, ink_table) {
        Some(s) => s,
        None => return 0.0,
    };

    let speed_score = printer.speed.min(100.0) / 100.0;
    let queue_score = 1.0 / (1.0 + snapshot.queue_size as f64);
    let extras_score = extras_factor(printer, sub_order);

    weights.paper * paper_score
        + weights.ink * ink_score
        + weights.speed * speed_score
        + weights.queue * queue_score
        + weights.extras * extras_score
}

fn paper_factor(need: &std::collections::BTreeMap<corelib::PaperKind, u32>, snapshot: &ResourceSnapshot) -> Option<f64> {
    let mut worst: f64 = f64::INFINITY;

    for (kind, needed) in need {
        let available = *snapshot.paper_count.get(kind).unwrap_or(&0) as f64;
        let needed = *needed as f64;
        if available < needed {
            return None;
        }
        let remaining_pct = if available > 0.0 { (available - needed) / available * 100.0 } else { 0.0 };
        worst = worst.min(remaining_pct);
    }

    Some(if worst.is_finite() { worst / 100.0 } else { 1.0 })
}

fn ink_factor(sub_order: &SubOrderRequirement, snapshot: &ResourceSnapshot, ink_table: &InkConsumptionTable) -> Option<f64> {
    let mut channels: BTreeSet<InkChannel> = BTreeSet::new();
    for ptype in sub_order.types() {
        channels.extend(ink_table.channels_for(&ptype).cloned());
    }

    let mut worst: f64 = f64::INFINITY;
    for channel in &channels {
        let available = *snapshot.ink.get(channel).unwrap_or(&0.0);
        if available <= 0.0 {
            return None;
        }
        worst = worst.min(available);
    }

    Some(if worst.is_finite() { worst / 100.0 } else { 1.0 })
}

fn extras_factor(printer: &Printer, sub_order: &SubOrderRequirement) -> f64 {
    let required = sub_order.types();
    let extras = printer.supported.difference(&required).count();
    1.0 - (extras.min(10) as f64) / 10.0
}
