//! Hashing is pluggable: the engine is parametric over a hasher factory, not
//! hardwired to one digest. [`Blake3Hasher`] is the crate's ready-to-use
//! default.

/// A fresh, stateful hash instance produced by a [`HasherFactory`].
pub trait Hasher {
    /// Feed bytes into the running hash state.
    fn update(&mut self, bytes: &[u8]);

    /// Finalize and return the digest. May be called more than once without
    /// consuming further input (mirrors `blake3::Hasher::finalize`).
    fn finalize(&self) -> Vec<u8>;

    /// The digest size in bytes, constant for a given factory.
    fn size(&self) -> usize;
}

/// Produces fresh [`Hasher`] instances. The digest size returned by
/// [`HasherFactory::hash_size`] must stay fixed across the lifetime of an MMR
/// instance and across save/load of the same root.
pub trait HasherFactory: Send + Sync {
    /// Construct a fresh hash state.
    fn new_hasher(&self) -> Box<dyn Hasher>;

    /// The digest size in bytes this factory's hashers produce.
    fn hash_size(&self) -> usize;
}

/// Blake3, the default hasher factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl HasherFactory for Blake3Hasher {
    fn new_hasher(&self) -> Box<dyn Hasher> {
        Box::new(Blake3HasherState(blake3::Hasher::new()))
    }

    fn hash_size(&self) -> usize {
        32
    }
}

struct Blake3HasherState(blake3::Hasher);

impl Hasher for Blake3HasherState {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(&self) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }

    fn size(&self) -> usize {
        32
    }
}

/// `H1(bytes) = hasher().update(bytes).finalize()`.
pub fn h1(factory: &dyn HasherFactory, bytes: &[u8]) -> Vec<u8> {
    let mut h = factory.new_hasher();
    h.update(bytes);
    h.finalize()
}

/// `aggregate(left, right) = hasher().update(salt).update(right).update(left).finalize()`.
///
/// Note the *right-before-left* update order: this is part of the wire
/// contract and must not be "simplified" to a more natural left-then-right
/// order.
pub fn aggregate(factory: &dyn HasherFactory, salt: &[u8], left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut h = factory.new_hasher();
    h.update(salt);
    h.update(right);
    h.update(left);
    h.finalize()
}
