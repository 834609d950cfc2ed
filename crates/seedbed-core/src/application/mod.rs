//! Application layer for Seedbed.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, VariantService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArtifactSetBuilder, GenerateService, GenerationReport, OutputSink, Preview, RunState,
    VariantInfo, // DTO for variant listings
    VariantService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{ArtifactCatalog, Filesystem};

pub use error::ApplicationError;
