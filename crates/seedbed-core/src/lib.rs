//! Seedbed Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Seedbed
//! project generator, following hexagonal (ports and adapters) architecture.
//! One database choice is resolved into a frozen [`domain::RenderContext`] and
//! threaded through every artifact template, so the generated files cannot
//! disagree about adapter, service image, port or credential keys.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           seedbed-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerateService, ArtifactSetBuilder)  │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: ArtifactCatalog, Filesystem) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    seedbed-adapters (Infrastructure)    │
//! │ (BuiltinCatalog, LocalFilesystem, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Variant, RenderContext, Template)      │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seedbed_core::application::GenerateService;
//!
//! // Inject adapters, then run
//! let service = GenerateService::new(catalog, filesystem);
//! let report = service.generate("postgresql", "my-shop", "./my-shop")?;
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerationReport, RunState, VariantInfo, VariantService,
        ports::{ArtifactCatalog, Filesystem},
    };
    pub use crate::domain::{
        ArtifactKind, ArtifactSpec, RenderContext, RenderedArtifact, Template, Variant,
        VariantParameters, parameters_for,
    };
    pub use crate::error::{SeedbedError, SeedbedResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
