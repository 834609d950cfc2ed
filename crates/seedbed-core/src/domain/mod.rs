// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Seedbed.
//!
//! This module contains pure logic with no I/O. Writing artifacts is handled
//! via ports (traits) defined in the application layer.
//!
//! ## Pipeline pieces
//!
//! - **Variant registry**: `variant` + `registry` + `parameters`
//! - **Render context**: `context`, the frozen per-run record
//! - **Template renderer**: `template`
//! - **Artifacts**: `artifact`, specs in and rendered files out
//!
// Public API - what the world sees
pub mod artifact;
pub mod context;
pub mod error;
pub mod parameters;
pub mod registry;
pub mod template;
pub mod variant;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use artifact::{ArtifactKind, ArtifactSpec, RenderedArtifact};
pub use context::RenderContext;
pub use error::{DomainError, ErrorCategory};
pub use parameters::{Credential, CredentialRole, DataService, VariantParameters};
pub use registry::{VARIANT_REGISTRY, VariantDef, parameters_for};
pub use template::{Condition, Template};
pub use variant::{Resolution, Variant};

pub use validation::DomainValidator;
