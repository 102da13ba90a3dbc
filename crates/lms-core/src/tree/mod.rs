//! Expansion state for the batch → user → course analytics trees.
//!
//! Nodes are identified by their full path from the batch, so the same
//! username under two batches maps to two distinct keys.

mod key;

pub use key::{NodeKey, ParseNodeKeyError};

use std::collections::BTreeSet;

/// Flat set of expanded node keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<NodeKey>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn expand(&mut self, key: NodeKey) {
        self.expanded.insert(key);
    }

    /// Collapse `key` and every expanded node beneath it.
    pub fn collapse(&mut self, key: &NodeKey) {
        self.expanded.retain(|k| k != key && !key.is_ancestor_of(k));
    }

    /// Flip a node; returns the new expanded flag.
    pub fn toggle(&mut self, key: NodeKey) -> bool {
        if self.is_expanded(&key) {
            self.collapse(&key);
            false
        } else {
            self.expand(key);
            true
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeKey> {
        self.expanded.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(batch: &str, name: &str) -> NodeKey {
        NodeKey::user(batch, name)
    }

    #[test]
    fn toggle_flips_state() {
        let mut s = ExpansionState::new();
        assert!(s.toggle(NodeKey::batch("b1")));
        assert!(s.is_expanded(&NodeKey::batch("b1")));
        assert!(!s.toggle(NodeKey::batch("b1")));
        assert!(s.is_empty());
    }

    #[test]
    fn same_username_in_two_batches_is_independent() {
        let mut s = ExpansionState::new();
        s.expand(user("b1", "alice"));
        assert!(s.is_expanded(&user("b1", "alice")));
        assert!(!s.is_expanded(&user("b2", "alice")));
    }

    #[test]
    fn collapsing_batch_collapses_descendants_only() {
        let mut s = ExpansionState::new();
        s.expand(NodeKey::batch("b1"));
        s.expand(user("b1", "alice"));
        s.expand(NodeKey::course("b1", "alice", "c9"));
        s.expand(NodeKey::batch("b10"));
        s.expand(user("b10", "alice"));
        s.collapse(&NodeKey::batch("b1"));
        assert_eq!(s.len(), 2);
        assert!(s.is_expanded(&NodeKey::batch("b10")));
        assert!(s.is_expanded(&user("b10", "alice")));
    }

    #[test]
    fn collapse_all_clears() {
        let mut s = ExpansionState::new();
        s.expand(NodeKey::batch("b1"));
        s.expand(user("b1", "bob"));
        s.collapse_all();
        assert!(s.is_empty());
    }
}
