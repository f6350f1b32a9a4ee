//! The MMR engine: owns a hasher factory, an immutable salt, and the
//! in-memory [`Store`], and implements append/get/root/save/load.

use std::sync::RwLock;

use rand::RngCore;

use crate::{
    error::{Error, Result},
    hasher::{aggregate, h1, HasherFactory},
    index::{self, Position},
    kv::Kv,
    node::{InteriorNode, ObjectNode},
    persistence,
    store::{Root, Store},
};

/// Fixed ASCII sentinel seeding root aggregation. A wire constant: changing
/// it changes every root hash ever produced.
const H_SENTINEL: &[u8; 6] = b"~ROOT~";

/// A defensive copy of the current root: its aggregate hash and the index
/// of the most recently appended leaf. `None` from [`Mmr::root`] means no
/// record has been appended yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootInfo {
    /// The aggregate root hash.
    pub hash: Vec<u8>,
    /// The index of the most recently appended leaf.
    pub tip_index: u64,
}

/// An append-only, hash-authenticated log backed by a Merkle Mountain
/// Range. Single-writer/multi-reader: `append` takes the store's write
/// lock, every other operation takes the read lock.
pub struct Mmr {
    factory: Box<dyn HasherFactory>,
    salt: [u8; 8],
    store: RwLock<Store>,
}

impl Mmr {
    /// An empty MMR with a freshly drawn random salt.
    pub fn new(factory: Box<dyn HasherFactory>) -> Self {
        let mut salt = [0u8; 8];
        rand::rng().fill_bytes(&mut salt);
        Mmr::with_salt(factory, salt)
    }

    /// An empty MMR with an explicit salt. Exists so tests (and callers
    /// replaying a fixed wire contract) can get byte-identical roots
    /// across runs; production callers should prefer [`Mmr::new`].
    pub fn with_salt(factory: Box<dyn HasherFactory>, salt: [u8; 8]) -> Self {
        Mmr {
            factory,
            salt,
            store: RwLock::new(Store::new()),
        }
    }

    /// Reconstruct an MMR from a KV store given only its root hash.
    pub fn from_kv(factory: Box<dyn HasherFactory>, root_hash: &[u8], kv: &dyn Kv) -> Result<Self> {
        let loaded = persistence::load(kv, root_hash, factory.hash_size())?;
        Ok(Mmr {
            factory,
            salt: loaded.salt,
            store: RwLock::new(loaded.store),
        })
    }

    /// Append `payload`, recompute the right spine and the root, and
    /// return the new root hash.
    pub fn append(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut store = self.store.write().expect("mmr store lock poisoned");

        let v = match store.get_root() {
            Some(root) => root.tip_index + 1,
            None => 0,
        };
        let leaf_hash = h1(self.factory.as_ref(), payload);
        store.set_object(v, ObjectNode::new(leaf_hash, payload.to_vec()));

        self.recompute_right_spine(&mut store, v);

        let peaks = index::peaks(v);
        let mut acc = H_SENTINEL.to_vec();
        for peak in &peaks {
            let peak_hash = store.hash_at(*peak)?;
            acc = aggregate(self.factory.as_ref(), &self.salt, &peak_hash, &acc);
        }
        store.set_root(Root {
            hash: acc.clone(),
            tip_index: v,
            peaks,
        });
        Ok(acc)
    }

    /// Walk up from the freshly appended leaf `v` while it is a right
    /// child, recomputing each interior node on the spine. Stops (and logs
    /// a warning) rather than erroring if a hash lookup fails partway —
    /// see the engine's documented silent-stop behavior.
    fn recompute_right_spine(&self, store: &mut Store, v: u64) {
        let mut w = Position::Leaf(v);
        while let Some(parent) = w.right_up() {
            let sibling = w.sibling();
            let sibling_hash = match store.hash_at(sibling) {
                Ok(hash) => hash,
                Err(_) => {
                    log::warn!(
                        "mmr: right-spine walk stopped before node {}: sibling hash missing",
                        parent.index()
                    );
                    return;
                }
            };
            let w_hash = match store.hash_at(w) {
                Ok(hash) => hash,
                Err(_) => {
                    log::warn!(
                        "mmr: right-spine walk stopped before node {}: node hash missing",
                        parent.index()
                    );
                    return;
                }
            };
            let combined = aggregate(self.factory.as_ref(), &self.salt, &sibling_hash, &w_hash);
            store.set_node(parent.index(), InteriorNode::new(combined));
            w = parent;
        }
    }

    /// Fetch the payload at `index`. Fails `OutOfRange` if `index` is past
    /// the current tip, `NotFound` if the leaf is (unexpectedly) absent.
    pub fn get(&self, index: u64) -> Result<Vec<u8>> {
        let store = self.store.read().expect("mmr store lock poisoned");
        match store.get_root() {
            Some(root) if index <= root.tip_index => {
                Ok(store.get_object(index)?.payload().to_vec())
            }
            Some(root) => Err(Error::OutOfRange {
                index,
                tip_index: root.tip_index,
            }),
            None => Err(Error::OutOfRange {
                index,
                tip_index: 0,
            }),
        }
    }

    /// A defensive copy of the current root, or `None` if nothing has been
    /// appended yet.
    pub fn root(&self) -> Option<RootInfo> {
        let store = self.store.read().expect("mmr store lock poisoned");
        store.get_root().map(|root| RootInfo {
            hash: root.hash.clone(),
            tip_index: root.tip_index,
        })
    }

    /// Serialize the current tree into `kv`. A no-op if nothing has been
    /// appended. Idempotent: keys already present in `kv` are left alone.
    pub fn save(&self, kv: &mut dyn Kv) -> Result<()> {
        let store = self.store.read().expect("mmr store lock poisoned");
        persistence::save(kv, &store, &self.salt)
    }

    /// A diagnostic dump of the in-memory working set.
    pub fn dump(&self) -> String {
        let store = self.store.read().expect("mmr store lock poisoned");
        store.dump()
    }
}
