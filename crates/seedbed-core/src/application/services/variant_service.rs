//! Variant Service - registry queries for listings.
//!
//! Separated from `GenerateService`: listing needs no catalog or filesystem.

use serde::Serialize;

use crate::{
    domain::{VARIANT_REGISTRY, Variant, registry},
    error::SeedbedResult,
};

/// Information about a variant for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub adapter: String,
    pub image: Option<String>,
    pub port: Option<u16>,
    pub summary: String,
    pub is_default: bool,
}

/// Service for variant queries.
#[derive(Debug, Default)]
pub struct VariantService;

impl VariantService {
    pub fn new() -> Self {
        Self
    }

    /// List every registered variant, in registry order.
    ///
    /// Fails only if the registry itself is inconsistent.
    pub fn list(&self) -> SeedbedResult<Vec<VariantInfo>> {
        registry::verify()?;

        Ok(VARIANT_REGISTRY
            .iter()
            .map(|def| {
                let params = &def.parameters;
                VariantInfo {
                    name: params.variant.as_str().to_string(),
                    aliases: params
                        .variant
                        .aliases()
                        .iter()
                        .skip(1)
                        .map(|a| a.to_string())
                        .collect(),
                    adapter: params.adapter.to_string(),
                    image: params.service.map(|s| s.image.to_string()),
                    port: params.service.map(|s| s.port),
                    summary: def.summary.to_string(),
                    is_default: params.variant == Variant::DEFAULT,
                }
            })
            .collect())
    }
}
