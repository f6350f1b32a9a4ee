//! An append-only, hash-authenticated log backed by a Merkle Mountain Range
//! (MMR).
//!
//! This crate provides the MMR itself — position algebra, an in-memory
//! working set, incremental peak aggregation on append, and recursive
//! content-addressed persistence/reload — and stays agnostic about payload
//! encoding, storage durability, and hash function choice: those are
//! supplied by the caller through the [`Kv`] and [`HasherFactory`] traits.
//!
//! # Core types
//!
//! - [`Mmr`] — the engine: `new`, `from_kv`, `append`, `get`, `root`, `save`.
//! - [`Position`] — the index algebra (object index vs. node index).
//! - [`Kv`] / [`MemoryKv`] — the content-addressed store contract and a
//!   ready-to-use in-memory implementation.
//! - [`Hasher`] / [`HasherFactory`] / [`Blake3Hasher`] — the pluggable
//!   hashing contract and its default instantiation.

#![warn(missing_docs)]

mod error;
mod hasher;
mod index;
mod kv;
mod mmr;
mod node;
mod persistence;
mod store;
#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use hasher::{Blake3Hasher, Hasher, HasherFactory};
pub use index::Position;
pub use kv::{Kv, MemoryKv};
pub use mmr::{Mmr, RootInfo};
pub use node::{InteriorNode, ObjectNode};
pub use store::Store;
