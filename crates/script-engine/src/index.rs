//! Handle types used to address nodes and ports
//!
//! Nodes are referenced by arena handles rather than references, so edges
//! and the evaluator only ever store these small copyable values.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

slotmap::new_key_type! {
    /// Stable handle of a node inside one graph's arena
    pub struct NodeIndex;
}

/// A port ordinal on a specific node
///
/// The same type addresses input and output ports; which one is meant
/// depends on the lookup it is passed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortIndex {
    pub node: NodeIndex,
    pub port: usize,
}

impl PortIndex {
    pub fn new(node: NodeIndex, port: usize) -> Self {
        Self { node, port }
    }
}

/// Identity token of a graph
///
/// Qualifies output-cache entries so nested evaluations of different graphs
/// never observe each other's values even when their handles overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(Uuid);

impl GraphId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_port_index_hashing() {
        let mut map: SlotMap<NodeIndex, ()> = SlotMap::with_key();
        let node = map.insert(());

        let mut set = std::collections::HashSet::new();
        set.insert(PortIndex::new(node, 0));
        set.insert(PortIndex::new(node, 0));
        set.insert(PortIndex::new(node, 1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_graph_ids_are_unique() {
        assert_ne!(GraphId::new(), GraphId::new());
    }
}
