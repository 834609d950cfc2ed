//! Per-variant parameter record shared by every artifact render.

use serde::Serialize;

use crate::domain::variant::Variant;

/// What a credential entry is used for in the data-store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialRole {
    Host,
    Port,
    Username,
    Password,
}

impl CredentialRole {
    /// Roles in the order they are emitted in connection blocks.
    pub const ALL: [CredentialRole; 4] = [Self::Host, Self::Port, Self::Username, Self::Password];

    /// Key name in the data-store config (`host:`, `port:`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Port => "port",
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    /// Prefix of the render variables exposing this role
    /// (`DATABASE_HOST_ENV`, `DATABASE_HOST_DEFAULT`, ...).
    pub const fn variable_prefix(&self) -> &'static str {
        match self {
            Self::Host => "DATABASE_HOST",
            Self::Port => "DATABASE_PORT",
            Self::Username => "DATABASE_USERNAME",
            Self::Password => "DATABASE_PASSWORD",
        }
    }
}

/// One connection setting sourced from an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub role: CredentialRole,
    /// Environment variable the generated app reads.
    pub env_var: &'static str,
    /// Value used when the environment variable is unset.
    pub default: &'static str,
}

/// The containerised data service a network variant needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataService {
    /// Default container image reference.
    pub image: &'static str,
    /// Default network port the service listens on.
    pub port: u16,
    /// Where the image keeps its data, mounted as a named volume.
    pub data_dir: &'static str,
    /// Environment variable naming the application database.
    pub database_env: &'static str,
    /// Ordered as [`CredentialRole::ALL`].
    pub credentials: &'static [Credential],
}

impl DataService {
    pub fn credential(&self, role: CredentialRole) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.role == role)
    }
}

/// Everything artifact templates may ask about the chosen variant.
///
/// Built once per run by `registry::parameters_for` and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantParameters {
    pub variant: Variant,
    /// Driver identifier written into the data-store config.
    pub adapter: &'static str,
    /// `None` for file-based variants.
    pub service: Option<DataService>,
}

impl VariantParameters {
    /// Flags templates can test with `{{#if FLAG}}` / `{{#if !FLAG}}`.
    pub const FLAGS: [&'static str; 2] = ["network_service", "file_based"];

    pub fn is_network_service(&self) -> bool {
        self.service.is_some()
    }

    /// Value of a named conditional flag, `None` for unknown names.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match name {
            "network_service" => Some(self.is_network_service()),
            "file_based" => Some(!self.is_network_service()),
            _ => None,
        }
    }

    /// Render variables derived from this record.
    ///
    /// Service variables are only present for network variants, so a
    /// template that uses them outside a `network_service` block is caught
    /// by the coverage check.
    pub fn variables(&self) -> Vec<(String, String)> {
        let mut vars = vec![
            ("DATABASE_VARIANT".to_string(), self.variant.to_string()),
            ("DATABASE_ADAPTER".to_string(), self.adapter.to_string()),
        ];

        if let Some(service) = &self.service {
            vars.push(("DATABASE_IMAGE".into(), service.image.into()));
            vars.push(("DATABASE_SERVICE_PORT".into(), service.port.to_string()));
            vars.push(("DATABASE_DATA_DIR".into(), service.data_dir.into()));
            vars.push(("DATABASE_NAME_ENV".into(), service.database_env.into()));

            for credential in service.credentials {
                let prefix = credential.role.variable_prefix();
                vars.push((format!("{prefix}_ENV"), credential.env_var.into()));
                vars.push((format!("{prefix}_DEFAULT"), credential.default.into()));
            }
        }

        vars
    }
}
