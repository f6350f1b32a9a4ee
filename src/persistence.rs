//! Binary format for the root record and recursive content-addressed
//! serialization of the tree beneath it.

use integer_encoding::VarInt;

use crate::{
    error::{Error, Result},
    index::Position,
    kv::Kv,
    node::{InteriorNode, ObjectNode},
    store::{Root, Store},
};

/// Encode the root entry: `tip_index` varint, 8-byte salt, then one
/// descriptor per peak (flag, varint index, hash).
pub(crate) fn encode_root_entry(store: &Store, root: &Root, salt: &[u8; 8]) -> Result<Vec<u8>> {
    let mut data = root.tip_index.encode_var_vec();
    data.extend_from_slice(salt);
    for peak in &root.peaks {
        data.push(if peak.is_leaf() { 0x01 } else { 0x00 });
        data.extend_from_slice(&peak.index().encode_var_vec());
        data.extend_from_slice(&store.hash_at(*peak)?);
    }
    Ok(data)
}

/// A parsed root entry: tip index, salt, and peak positions paired with
/// their stored hashes.
pub(crate) struct DecodedRoot {
    pub(crate) tip_index: u64,
    pub(crate) salt: [u8; 8],
    pub(crate) peaks: Vec<(Position, Vec<u8>)>,
}

/// Decode a root entry produced by [`encode_root_entry`]. `hash_size` is the
/// digest length of the hasher used to build the tree.
pub(crate) fn decode_root_entry(data: &[u8], hash_size: usize) -> Result<DecodedRoot> {
    let (tip_index, consumed) =
        u64::decode_var(data).ok_or_else(|| Error::Corrupt("truncated tip_index varint".into()))?;
    let mut rest = &data[consumed..];

    if rest.len() < 8 {
        return Err(Error::Corrupt(
            "root entry shorter than 8 bytes after tip_index varint".into(),
        ));
    }
    let mut salt = [0u8; 8];
    salt.copy_from_slice(&rest[..8]);
    rest = &rest[8..];

    let mut peaks = Vec::new();
    while rest.len() > 1 {
        let flag = rest[0];
        rest = &rest[1..];
        let (index, consumed) = u64::decode_var(rest)
            .ok_or_else(|| Error::Corrupt("truncated peak index varint".into()))?;
        rest = &rest[consumed..];
        if rest.len() < hash_size {
            return Err(Error::Corrupt("truncated peak hash".into()));
        }
        let hash = rest[..hash_size].to_vec();
        rest = &rest[hash_size..];
        let position = if flag == 0x01 {
            Position::Leaf(index)
        } else {
            Position::Node(index)
        };
        peaks.push((position, hash));
    }

    Ok(DecodedRoot {
        tip_index,
        salt,
        peaks,
    })
}

/// Recursively emit the subtree rooted at `position`. Content-addressed and
/// idempotent: a key already present in `kv` is left untouched.
fn save_node(kv: &mut dyn Kv, store: &Store, position: Position) -> Result<Vec<u8>> {
    let hash = store.hash_at(position)?;
    if kv.has(&hash) {
        return Ok(hash);
    }
    match position {
        Position::Leaf(i) => {
            let payload = store.get_object(i)?.payload().to_vec();
            kv.set(hash.clone(), payload)?;
        }
        Position::Node(_) => {
            let (left, right) = position
                .children()
                .expect("interior node always has children");
            let left_hash = save_node(kv, store, left)?;
            let right_hash = save_node(kv, store, right)?;
            let mut value = Vec::with_capacity(left_hash.len() + right_hash.len());
            value.extend_from_slice(&left_hash);
            value.extend_from_slice(&right_hash);
            kv.set(hash.clone(), value)?;
        }
    }
    Ok(hash)
}

/// Serialize the current tree to `kv`: the root entry under `root.hash`,
/// then each peak's subtree recursively. A no-op if the MMR is empty (no
/// root yet).
pub(crate) fn save(kv: &mut dyn Kv, store: &Store, salt: &[u8; 8]) -> Result<()> {
    let root = match store.get_root() {
        Some(root) => root.clone(),
        None => return Ok(()),
    };
    let entry = encode_root_entry(store, &root, salt)?;
    kv.set(root.hash.clone(), entry)?;
    for peak in &root.peaks {
        save_node(kv, store, *peak)?;
    }
    Ok(())
}

/// The result of [`load`]: a freshly populated store and the salt read back
/// from the root entry.
pub(crate) struct Loaded {
    pub(crate) store: Store,
    pub(crate) salt: [u8; 8],
}

fn load_node(
    kv: &dyn Kv,
    store: &mut Store,
    position: Position,
    hash: Vec<u8>,
    hash_size: usize,
) -> Result<()> {
    let value = kv.get(&hash)?;
    match position {
        Position::Leaf(i) => {
            store.set_object(i, ObjectNode::new(hash, value));
        }
        Position::Node(i) => {
            if value.len() != 2 * hash_size {
                return Err(Error::Corrupt(format!(
                    "interior node value is {} bytes, expected {}",
                    value.len(),
                    2 * hash_size
                )));
            }
            store.set_node(i, InteriorNode::new(hash));
            let (left, right) = position
                .children()
                .expect("interior node always has children");
            let left_hash = value[..hash_size].to_vec();
            let right_hash = value[hash_size..].to_vec();
            load_node(kv, store, left, left_hash, hash_size)?;
            load_node(kv, store, right, right_hash, hash_size)?;
        }
    }
    Ok(())
}

/// Reconstruct an MMR's working set from `kv` given only the root hash.
pub(crate) fn load(kv: &dyn Kv, root_hash: &[u8], hash_size: usize) -> Result<Loaded> {
    let entry = kv.get(root_hash)?;
    let decoded = decode_root_entry(&entry, hash_size)?;

    let mut store = Store::new();
    let mut peak_positions = Vec::with_capacity(decoded.peaks.len());
    for (position, hash) in decoded.peaks {
        load_node(kv, &mut store, position, hash, hash_size)?;
        peak_positions.push(position);
    }
    store.set_root(Root {
        hash: root_hash.to_vec(),
        tip_index: decoded.tip_index,
        peaks: peak_positions,
    });

    Ok(Loaded {
        store,
        salt: decoded.salt,
    })
}
