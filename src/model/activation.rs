//! Per-node activation state.
//!
//! Absence from the map means idle. Roles merge: a node lit as `Source` that is
//! then lit as `Target` becomes `Both`, and releasing one role from `Both`
//! leaves the other. Releasing the last role removes the entry.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use super::NodeId;

/// Highlight class of a lit node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Source,
    Target,
    Both,
}

impl Activation {
    /// Union of two roles.
    pub fn merge(self, other: Activation) -> Activation {
        if self == other { self } else { Activation::Both }
    }

    /// Remove `role` from `self`. `None` means nothing is left.
    pub fn without(self, role: Activation) -> Option<Activation> {
        match (self, role) {
            (_, Activation::Both) => None,
            (Activation::Both, Activation::Source) => Some(Activation::Target),
            (Activation::Both, Activation::Target) => Some(Activation::Source),
            (current, role) if current == role => None,
            (current, _) => Some(current),
        }
    }
}

/// Node id → activation. Mutated only through key-level operations so that
/// independent timers touching different nodes never clobber each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationMap {
    entries: HashMap<NodeId, Activation>,
}

impl ActivationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `role` to the node, merging with whatever it already holds.
    pub fn light(&mut self, id: NodeId, role: Activation) {
        self.entries
            .entry(id)
            .and_modify(|a| *a = a.merge(role))
            .or_insert(role);
    }

    /// Drop `role` from the node; removes the entry once no role remains.
    pub fn release(&mut self, id: NodeId, role: Activation) {
        if let Some(current) = self.entries.get(&id).copied() {
            match current.without(role) {
                Some(rest) => { self.entries.insert(id, rest); }
                None => { self.entries.remove(&id); }
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<Activation> {
        self.entries.get(&id).copied()
    }

    pub fn is_lit(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries sorted by node id.
    pub fn sorted(&self) -> Vec<(NodeId, Activation)> {
        let mut out: Vec<_> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Activation)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_merge_and_release() {
        let mut map = ActivationMap::new();
        map.light(NodeId(2), Activation::Source);
        map.light(NodeId(2), Activation::Target);
        assert_eq!(map.get(NodeId(2)), Some(Activation::Both));

        map.release(NodeId(2), Activation::Source);
        assert_eq!(map.get(NodeId(2)), Some(Activation::Target));

        map.release(NodeId(2), Activation::Target);
        assert!(map.get(NodeId(2)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn releasing_unheld_role_is_noop() {
        let mut map = ActivationMap::new();
        map.light(NodeId(1), Activation::Target);
        map.release(NodeId(1), Activation::Source);
        assert_eq!(map.get(NodeId(1)), Some(Activation::Target));
        map.release(NodeId(5), Activation::Target);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn releasing_both_clears_entry() {
        let mut map = ActivationMap::new();
        map.light(NodeId(0), Activation::Both);
        map.release(NodeId(0), Activation::Both);
        assert!(map.is_empty());
    }
}
