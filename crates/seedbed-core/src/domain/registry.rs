//! Variant registry.
//!
//! Single static table describing what every artifact needs to know about a
//! variant. [`parameters_for`] is an O(n) lookup that cannot fail for any
//! enumerated [`Variant`]; [`verify`] asserts the table is complete and
//! self-consistent. `GenerateService` runs it before resolving a choice and
//! `VariantService` before listing.
//!
//! # Adding a New Variant
//!
//! 1. Add the variant in `variant.rs`
//! 2. Add one [`VariantDef`] entry to [`VARIANT_REGISTRY`]
//! 3. That's it: templates read every value through the render context

use std::collections::HashSet;

use crate::domain::error::DomainError;
use crate::domain::parameters::{Credential, CredentialRole, DataService, VariantParameters};
use crate::domain::variant::Variant;

/// Registry entry: the frozen parameters for one variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantDef {
    pub parameters: VariantParameters,
    /// One-line description for listings.
    pub summary: &'static str,
}

/// Single source of truth for variant parameters.
pub static VARIANT_REGISTRY: &[VariantDef] = &[
    VariantDef {
        parameters: VariantParameters {
            variant: Variant::Sqlite,
            adapter: "sqlite3",
            service: None,
        },
        summary: "File-based SQLite database, no data service",
    },
    VariantDef {
        parameters: VariantParameters {
            variant: Variant::Postgresql,
            adapter: "postgresql",
            service: Some(DataService {
                image: "postgres:16-alpine",
                port: 5432,
                data_dir: "/var/lib/postgresql/data",
                database_env: "POSTGRES_DB",
                credentials: &[
                    Credential {
                        role: CredentialRole::Host,
                        env_var: "POSTGRES_HOST",
                        default: "localhost",
                    },
                    Credential {
                        role: CredentialRole::Port,
                        env_var: "POSTGRES_PORT",
                        default: "5432",
                    },
                    Credential {
                        role: CredentialRole::Username,
                        env_var: "POSTGRES_USER",
                        default: "postgres",
                    },
                    Credential {
                        role: CredentialRole::Password,
                        env_var: "POSTGRES_PASSWORD",
                        default: "postgres",
                    },
                ],
            }),
        },
        summary: "PostgreSQL service container",
    },
    VariantDef {
        parameters: VariantParameters {
            variant: Variant::Mysql,
            adapter: "mysql2",
            service: Some(DataService {
                image: "mysql:8.0",
                port: 3306,
                data_dir: "/var/lib/mysql",
                database_env: "MYSQL_DATABASE",
                credentials: &[
                    Credential {
                        role: CredentialRole::Host,
                        env_var: "MYSQL_HOST",
                        default: "localhost",
                    },
                    Credential {
                        role: CredentialRole::Port,
                        env_var: "MYSQL_PORT",
                        default: "3306",
                    },
                    Credential {
                        role: CredentialRole::Username,
                        env_var: "MYSQL_USER",
                        default: "app",
                    },
                    Credential {
                        role: CredentialRole::Password,
                        env_var: "MYSQL_PASSWORD",
                        default: "password",
                    },
                ],
            }),
        },
        summary: "MySQL service container",
    },
];

/// Look up the definition for a variant.
pub fn find_variant(variant: Variant) -> Option<&'static VariantDef> {
    VARIANT_REGISTRY
        .iter()
        .find(|def| def.parameters.variant == variant)
}

/// Parameters for a variant.
///
/// Completeness of [`VARIANT_REGISTRY`] is checked by [`verify`]; a missing
/// entry is a build defect, not a runtime condition.
pub fn parameters_for(variant: Variant) -> VariantParameters {
    match find_variant(variant) {
        Some(def) => def.parameters,
        None => unreachable!("variant {variant} has no registry entry"),
    }
}

/// Check the registry invariants.
///
/// - every [`Variant`] has exactly one entry
/// - file-based variants carry no data service, network variants do
/// - network variants list every [`CredentialRole`] once, in order
/// - a service's port credential defaults to the service port
pub fn verify() -> Result<(), DomainError> {
    verify_table(VARIANT_REGISTRY)
}

/// [`verify`] over an arbitrary table.
pub fn verify_table(table: &[VariantDef]) -> Result<(), DomainError> {
    for variant in Variant::ALL {
        let count = table
            .iter()
            .filter(|def| def.parameters.variant == variant)
            .count();
        if count != 1 {
            return Err(DomainError::InconsistentRegistry(format!(
                "{variant} has {count} entries"
            )));
        }
    }

    for def in table {
        let params = &def.parameters;
        match (&params.service, params.variant.is_file_based()) {
            (Some(_), true) => {
                return Err(DomainError::InconsistentRegistry(format!(
                    "{} is file-based but declares a data service",
                    params.variant
                )));
            }
            (None, false) => {
                return Err(DomainError::InconsistentRegistry(format!(
                    "{} needs a data service",
                    params.variant
                )));
            }
            (Some(service), false) => verify_service(params.variant, service)?,
            (None, true) => {}
        }
    }

    Ok(())
}

fn verify_service(variant: Variant, service: &DataService) -> Result<(), DomainError> {
    let roles: Vec<_> = service.credentials.iter().map(|c| c.role).collect();
    if roles != CredentialRole::ALL {
        return Err(DomainError::InconsistentRegistry(format!(
            "{variant} credentials must be host, port, username, password"
        )));
    }

    let mut seen = HashSet::new();
    for credential in service.credentials {
        if !seen.insert(credential.env_var) {
            return Err(DomainError::InconsistentRegistry(format!(
                "{variant} reuses env var {}",
                credential.env_var
            )));
        }
    }

    let port_default = service
        .credential(CredentialRole::Port)
        .map(|c| c.default)
        .unwrap_or_default();
    if port_default != service.port.to_string() {
        return Err(DomainError::InconsistentRegistry(format!(
            "{variant} port default {port_default} differs from service port {}",
            service.port
        )));
    }

    Ok(())
}
