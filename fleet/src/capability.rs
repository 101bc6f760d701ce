use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use corelib::{Printer, PrintType};

/// Inverted index: print type -> set of printer ids that support it.
///
/// Reads (lookups during scheduling) take a shared lock; a rebuild (fleet
/// composition change) takes an exclusive one. Rebuilds are expected to be
/// rare relative to lookups.
pub struct CapabilityIndex {
    by_type: RwLock<HashMap<PrintType, BTreeSet<String>>>,
}

impl CapabilityIndex {
    pub fn build(printers: &[Printer]) -> Self {
        let index = Self {
            by_type: RwLock::new(HashMap::new()),
        };
        index.rebuild(printers);
        index
    }

    /// Printers capable of handling every type in `types`, excluding
    /// printers currently marked offline. Empty input yields an empty
    /// result: a sub-order with no types has nothing to be capable of.
    pub fn find_capable(&self, types: &BTreeSet<PrintType>, online: &dyn Fn(&str) -> bool) -> Vec<String> {
        if types.is_empty() {
            return Vec::new();
        }

        let guard = self.by_type.read().expect("capability index lock poisoned");

        let mut iter = types.iter();
        let first = match iter.next() {
            Some(t) => guard.get(t).cloned().unwrap_or_default(),
            None => return Vec::new(),
        };

        let mut candidates = first;
        for t in iter {
            let set = guard.get(t).cloned().unwrap_or_default();
            candidates = candidates.intersection(&set).cloned().collect();
            if candidates.is_empty() {
                break;
            }
        }

        candidates.into_iter().filter(|id| online(id)).collect()
    }

    pub fn rebuild(&self, printers: &[Printer]) {
        let mut by_type: HashMap<PrintType, BTreeSet<String>> = HashMap::new();
        for printer in printers {
            for ptype in &printer.supported {
                by_type.entry(ptype.clone()).or_default().insert(printer.id.clone());
            }
        }

        let mut guard = self.by_type.write().expect("capability index lock poisoned");
        *guard = by_type;
    }
}
