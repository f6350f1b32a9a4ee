//! The abstract key/value store the engine persists to and reloads from.
//! The core only ever does point lookups and point writes; no iteration,
//! no deletion. [`MemoryKv`] is a ready-to-use in-memory implementation for
//! tests and ephemeral use.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A content-addressed key/value store. Implementations are assumed to
/// provide their own thread-safety; the engine performs only point
/// operations against this trait.
pub trait Kv {
    /// `true` if `key` is present.
    fn has(&self, key: &[u8]) -> bool;

    /// Look up `key`. Returns [`Error::NotFound`] on a miss.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Store `value` under `key`.
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// A diagnostic, human-readable dump of the store's contents.
    fn dump(&self) -> String;
}

/// An in-memory [`Kv`] backed by a `HashMap`. Useful for tests and
/// ephemeral round-trips; callers needing durability supply their own `Kv`.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryKv {
    /// An empty in-memory store.
    pub fn new() -> Self {
        MemoryKv::default()
    }
}

impl Kv for MemoryKv {
    fn has(&self, key: &[u8]) -> bool {
        self.data.contains_key(key)
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.data
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("kv key {}", hex::encode(key))))
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.data.insert(key, value);
        Ok(())
    }

    fn dump(&self) -> String {
        let mut keys: Vec<_> = self.data.keys().cloned().collect();
        keys.sort();
        let mut out = String::new();
        for k in keys {
            out.push_str(&format!(
                "{} : {}\n",
                hex::encode(&k),
                hex::encode(&self.data[&k])
            ));
        }
        out
    }
}
