//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `seedbed-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: where the output sink writes
//!   - `ArtifactCatalog`: which artifacts a run renders
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `GenerateService::generate`

pub mod output;

pub use output::{ArtifactCatalog, Filesystem};
