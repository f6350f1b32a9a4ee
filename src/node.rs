//! The two node kinds an MMR stores: leaves carry a payload, interior nodes
//! carry only a hash.

/// A leaf node: an appended record's payload and the hash of that payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    hash: Vec<u8>,
    payload: Vec<u8>,
}

impl ObjectNode {
    /// Construct a leaf node from its payload and precomputed hash.
    pub fn new(hash: Vec<u8>, payload: Vec<u8>) -> Self {
        ObjectNode { hash, payload }
    }

    /// The leaf's hash (`H1(payload)`).
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// An interior node: the aggregate hash of its two children. Interior nodes
/// never carry a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorNode {
    hash: Vec<u8>,
}

impl InteriorNode {
    /// Construct an interior node from its aggregate hash.
    pub fn new(hash: Vec<u8>) -> Self {
        InteriorNode { hash }
    }

    /// The node's aggregate hash.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
}
