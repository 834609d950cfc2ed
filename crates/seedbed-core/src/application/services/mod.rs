//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a project" or "list variants".

pub mod artifact_set_builder;
pub mod generate_service;
pub mod output_sink;
pub mod variant_service;

pub use artifact_set_builder::ArtifactSetBuilder;
pub use generate_service::{GenerateService, GenerationReport, Preview, RunState};
pub use output_sink::OutputSink;
pub use variant_service::{VariantInfo, VariantService};
