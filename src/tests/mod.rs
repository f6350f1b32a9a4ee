//! Cross-cutting integration and property tests: fixed-shape scenarios in
//! [`test_mmr`], incremental/property-based checks in [`test_incremental`].

mod test_incremental;
