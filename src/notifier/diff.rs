// SPDX-License-Identifier: GPL-3.0-only
use std::collections::BTreeSet;

/// Names that disappeared and appeared between two listings, both sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len() + self.added.len()
    }
}

/// Full set difference in both directions between `known` and `current`
pub fn diff(known: &BTreeSet<String>, current: &BTreeSet<String>) -> Changes {
    Changes {
        removed: known.difference(current).cloned().collect(),
        added: current.difference(known).cloned().collect(),
    }
}
