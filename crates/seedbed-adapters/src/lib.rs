//! Infrastructure adapters for Seedbed.
//!
//! This crate implements the ports defined in `seedbed-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod catalog;
pub mod filesystem;

// Re-export commonly used adapters
pub use catalog::{BuiltinCatalog, DirectoryCatalog};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
