#![deny(unsafe_code)]

//! OS-level adapters for linkstage.

pub mod fs;

// Re-export the filesystem port implementation
pub use fs::LocalFileSystem;
