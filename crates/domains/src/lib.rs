//! The central domain logic and interface definitions for the task board:
//! entities, the role model, the permission evaluator and repository ports.
//!
//! This crate performs no I/O.

pub mod errors;
pub mod models;
pub mod permissions;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::{DomainError, DomainResult, ErrorKind};
pub use models::*;
pub use ports::*;
