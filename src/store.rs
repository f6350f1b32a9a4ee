//! The in-memory working set an MMR engine mutates on every append: a map
//! from object index to leaf, a map from node index to interior node, and
//! the current root. The engine wraps a [`Store`] in a single read/write
//! lock (see `mmr.rs`); `Store` itself does no locking.

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    index::Position,
    node::{InteriorNode, ObjectNode},
};

/// The current root: its aggregate hash, the index of the most recently
/// appended leaf, and the ordered peak positions that were folded to produce
/// the hash.
#[derive(Debug, Clone)]
pub(crate) struct Root {
    pub(crate) hash: Vec<u8>,
    pub(crate) tip_index: u64,
    pub(crate) peaks: Vec<Position>,
}

/// The MMR's working set: leaves, interior nodes, and the current root.
#[derive(Debug, Default)]
pub struct Store {
    objects: HashMap<u64, ObjectNode>,
    nodes: HashMap<u64, InteriorNode>,
    root: Option<Root>,
}

impl Store {
    /// An empty store: no leaves, no interior nodes, no root.
    pub fn new() -> Self {
        Store::default()
    }

    pub(crate) fn get_object(&self, index: u64) -> Result<&ObjectNode> {
        self.objects
            .get(&index)
            .ok_or_else(|| Error::NotFound(format!("object index {index}")))
    }

    pub(crate) fn set_object(&mut self, index: u64, node: ObjectNode) {
        self.objects.insert(index, node);
    }

    pub(crate) fn get_node(&self, index: u64) -> Result<&InteriorNode> {
        self.nodes
            .get(&index)
            .ok_or_else(|| Error::NotFound(format!("node index {index}")))
    }

    pub(crate) fn set_node(&mut self, index: u64, node: InteriorNode) {
        self.nodes.insert(index, node);
    }

    pub(crate) fn get_root(&self) -> Option<&Root> {
        self.root.as_ref()
    }

    pub(crate) fn set_root(&mut self, root: Root) {
        self.root = Some(root);
    }

    /// Look up the hash at a position, whichever map it belongs to.
    pub(crate) fn hash_at(&self, position: Position) -> Result<Vec<u8>> {
        match position {
            Position::Leaf(i) => self.get_object(i).map(|o| o.hash().to_vec()),
            Position::Node(i) => self.get_node(i).map(|n| n.hash().to_vec()),
        }
    }

    /// Diagnostic dump, sorted by index ascending within each section so the
    /// output does not depend on hash-map iteration order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("objects: {}\n", self.objects.len()));
        let mut object_keys: Vec<_> = self.objects.keys().copied().collect();
        object_keys.sort_unstable();
        for k in object_keys {
            out.push_str(&format!("  {k} {}\n", hex::encode(self.objects[&k].hash())));
        }
        out.push_str(&format!("nodes: {}\n", self.nodes.len()));
        let mut node_keys: Vec<_> = self.nodes.keys().copied().collect();
        node_keys.sort_unstable();
        for k in node_keys {
            out.push_str(&format!("  {k} {}\n", hex::encode(self.nodes[&k].hash())));
        }
        if let Some(root) = &self.root {
            out.push_str(&format!(
                "root: tip={} hash={}\n",
                root.tip_index,
                hex::encode(&root.hash)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_is_not_found() {
        let store = Store::new();
        assert!(matches!(store.get_object(0), Err(Error::NotFound(_))));
    }

    #[test]
    fn set_then_get_object_round_trips() {
        let mut store = Store::new();
        store.set_object(0, ObjectNode::new(vec![1], b"p".to_vec()));
        assert_eq!(store.get_object(0).unwrap().payload(), b"p");
    }

    #[test]
    fn dump_is_order_independent() {
        let mut a = Store::new();
        a.set_object(1, ObjectNode::new(vec![1], b"a".to_vec()));
        a.set_object(0, ObjectNode::new(vec![0], b"b".to_vec()));

        let mut b = Store::new();
        b.set_object(0, ObjectNode::new(vec![0], b"b".to_vec()));
        b.set_object(1, ObjectNode::new(vec![1], b"a".to_vec()));

        assert_eq!(a.dump(), b.dump());
    }
}
