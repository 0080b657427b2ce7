//! Storage adapters implementing the `domains` repository ports.
//!
//! SQL-backed adapters are not part of this workspace; the in-memory store
//! backs the seed binary and the integration tests.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
