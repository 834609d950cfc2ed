//! The database variant a generation run is parameterised by.
//!
//! # Design
//!
//! `Variant` is a pure value type: `Copy`, equality-by-value, no identity.
//! It holds NO per-variant parameters. Adapters, images, ports and credential
//! keys live in `registry.rs`. This file only defines the closed set, its
//! string forms, and the two parsers:
//!
//! - [`Variant::from_str`] is strict and fails on unknown input.
//! - [`Variant::resolve`] is lenient and always yields a variant, falling back
//!   to [`Variant::DEFAULT`] with a warning.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant and its `as_str` / alias arms here
//! 2. Add a `VariantDef` entry in `registry.rs`
//! 3. Done: every artifact template picks it up through the context

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::DomainError;

/// A supported backend storage variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// File-based, needs no data service.
    #[default]
    #[serde(rename = "sqlite3")]
    Sqlite,
    Postgresql,
    Mysql,
}

impl Variant {
    /// Every variant, in registry order.
    pub const ALL: [Variant; 3] = [Self::Sqlite, Self::Postgresql, Self::Mysql];

    /// The variant used whenever the caller's choice cannot be resolved.
    pub const DEFAULT: Variant = Self::Sqlite;

    /// Canonical tag, as used in templates (`{{#if variant == postgresql}}`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite3",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    /// Accepted spellings for this variant, canonical tag first.
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Sqlite => &["sqlite3", "sqlite"],
            Self::Postgresql => &["postgresql", "postgres", "pg"],
            Self::Mysql => &["mysql"],
        }
    }

    /// Whether the variant stores data in a local file rather than a service.
    pub const fn is_file_based(self) -> bool {
        matches!(self, Self::Sqlite)
    }

    /// Resolve free-form user input to a variant.
    ///
    /// Matching trims surrounding whitespace and ignores case. Input that
    /// names no known variant resolves to [`Variant::DEFAULT`]; the returned
    /// [`Resolution`] then carries a warning for the user. This never fails.
    pub fn resolve(raw: &str) -> Resolution {
        match Self::lookup(raw) {
            Some(variant) => Resolution {
                variant,
                warning: None,
            },
            None => {
                let warning = format!(
                    "unsupported database '{}', falling back to {}",
                    raw.trim(),
                    Self::DEFAULT
                );
                warn!(input = %raw, fallback = %Self::DEFAULT, "unsupported database choice");
                Resolution {
                    variant: Self::DEFAULT,
                    warning: Some(warning),
                }
            }
        }
    }

    fn lookup(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.aliases().contains(&needle.as_str()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| DomainError::UnknownVariant {
            input: s.trim().to_string(),
        })
    }
}

/// Outcome of [`Variant::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub variant: Variant,
    /// Set when the input was not recognised and the default was substituted.
    pub warning: Option<String>,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}
