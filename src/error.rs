/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for MMR log operations.
///
/// Covers missing data, out-of-range reads, corrupt persisted state, and
/// errors propagated from the external payload codec or KV store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An object or interior node index is absent from the store, or a KV
    /// lookup missed.
    #[error("not found: {0}")]
    NotFound(String),
    /// `get(index)` was called with `index > tip_index`.
    #[error("index {index} out of range (tip is {tip_index})")]
    OutOfRange {
        /// The requested index.
        index: u64,
        /// The current tip index.
        tip_index: u64,
    },
    /// Persisted state (root entry, node value) was truncated or malformed.
    #[error("corrupt persisted state: {0}")]
    Corrupt(String),
    /// The external payload codec failed to encode or decode a value.
    #[error("codec error: {0}")]
    Codec(String),
    /// The backing KV store returned an error from `get`/`set`.
    #[error("kv store error: {0}")]
    Kv(String),
}
