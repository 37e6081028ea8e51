mod cache_config;
mod database_config;
mod raw_config;
mod security_config;

pub use self::{
    cache_config::CacheConfig, database_config::DatabaseConfig, raw_config::RawConfig,
    security_config::SecurityConfig,
};

/// Main server config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Version of the Data Vault binary.
    pub version: String,
    /// HTTP port to bind API server to.
    pub port: u16,
    /// Relational store configuration.
    pub db: DatabaseConfig,
    /// Key-material vault configuration.
    pub key_vault: DatabaseConfig,
    /// Security configuration.
    pub security: SecurityConfig,
    /// Credential cache configuration.
    pub cache: CacheConfig,
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            port: raw_config.port,
            db: raw_config.db,
            key_vault: raw_config.key_vault,
            security: raw_config.security,
            cache: raw_config.cache,
        }
    }
}
