//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `std::fs` calls behind these signatures in core
//! - Intent-based methods (list, copy, delete), not handle-based I/O
//! - Implementations live in adapters (`linkstage-runtime`, test fakes)

pub mod filesystem;

pub use filesystem::{FileSystemError, FileSystemPort};

#[cfg(test)]
pub use filesystem::MockFileSystemPort;
