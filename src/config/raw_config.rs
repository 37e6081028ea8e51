use crate::config::{CacheConfig, DatabaseConfig, SecurityConfig};
use figment::{Figment, Metadata, Profile, Provider, providers, providers::Format, value};
use serde_derive::{Deserialize, Serialize};

/// Raw configuration structure that is used to read the configuration from the file.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RawConfig {
    /// Defines a TCP port to listen on.
    pub port: u16,
    /// Relational store (users, secrets, permissions, groups, access tokens) configuration.
    pub db: DatabaseConfig,
    /// Key-material vault and access log store configuration.
    pub key_vault: DatabaseConfig,
    /// Security configuration (access tokens, encryption, built-in users).
    pub security: SecurityConfig,
    /// Credential cache configuration.
    pub cache: CacheConfig,
}

impl RawConfig {
    /// Reads the configuration from the file (TOML) and merges it with the default values.
    pub fn read_from_file(path: &str) -> anyhow::Result<Self> {
        Ok(Figment::from(RawConfig::default())
            .merge(providers::Toml::file(path))
            .merge(providers::Env::prefixed("DATA_VAULT_").split("__"))
            .extract()?)
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db: DatabaseConfig::default(),
            key_vault: DatabaseConfig::key_vault(),
            security: SecurityConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Provider for RawConfig {
    fn metadata(&self) -> Metadata {
        Metadata::named("Data Vault main configuration")
    }

    fn data(&self) -> Result<value::Map<Profile, value::Dict>, figment::Error> {
        providers::Serialized::defaults(Self::default()).data()
    }
}
