//! Static transition tables.
//!
//! A table maps a target value to the set of values allowed to transition
//! into it. It is an adjacency check for a proposed change, not a running
//! state machine.

use std::collections::{BTreeMap, BTreeSet};

/// Target value -> permitted origin values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    origins: BTreeMap<i64, BTreeSet<i64>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds origins for a target. Repeated calls for the same target merge.
    pub fn insert(&mut self, to: i64, origins: impl IntoIterator<Item = i64>) {
        self.origins.entry(to).or_default().extend(origins);
    }

    /// Returns the permitted origins for `to`, if the table has an entry.
    pub fn origins(&self, to: i64) -> Option<&BTreeSet<i64>> {
        self.origins.get(&to)
    }

    /// Self transitions always pass; a missing target entry permits nothing else.
    pub fn allows(&self, from: i64, to: i64) -> bool {
        from == to || self.origins.get(&to).is_some_and(|o| o.contains(&from))
    }

    /// Returns every target reachable from `from` in one step, excluding `from`.
    pub fn targets_from(&self, from: i64) -> Vec<i64> {
        self.origins
            .iter()
            .filter(|(to, origins)| **to != from && origins.contains(&from))
            .map(|(to, _)| *to)
            .collect()
    }

    /// Iterates entries ascending by target.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &BTreeSet<i64>)> {
        self.origins.iter().map(|(to, o)| (*to, o))
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

impl FromIterator<(i64, Vec<i64>)> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = (i64, Vec<i64>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (to, origins) in iter {
            table.insert(to, origins);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beer_table() -> TransitionTable {
        TransitionTable::from_iter([(1, vec![0]), (2, vec![1])])
    }

    #[test]
    fn test_allows() {
        let table = beer_table();
        assert!(table.allows(0, 1));
        assert!(table.allows(1, 2));
        assert!(!table.allows(0, 2));
        assert!(!table.allows(2, 1));
        // No entry for target 0
        assert!(!table.allows(1, 0));
    }

    #[test]
    fn test_self_transition_without_entry() {
        let table = TransitionTable::new();
        assert!(table.allows(5, 5));
        assert!(!table.allows(4, 5));
    }

    #[test]
    fn test_insert_merges() {
        let mut table = beer_table();
        table.insert(2, [0]);
        let origins: Vec<i64> = table.origins(2).unwrap().iter().copied().collect();
        assert_eq!(origins, vec![0, 1]);
    }

    #[test]
    fn test_targets_from() {
        let mut table = beer_table();
        table.insert(2, [0]);
        table.insert(0, [0]);
        assert_eq!(table.targets_from(0), vec![1, 2]);
        assert!(table.targets_from(2).is_empty());
    }
}
