use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use std::time::Duration;

/// Configuration for authentication and secret encryption.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    /// Lifetime of the issued access tokens. Default is 24 hours.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_access_token_lifetime")]
    pub access_token_lifetime: Duration,
    /// Size of the per-secret encryption key in bytes (16, 24 or 32). The nonce is generated with
    /// the same size, so this must not change while secrets encrypted with another size exist.
    #[serde(default = "default_encryption_key_size")]
    pub encryption_key_size: usize,
    /// Users to create at start-up, `client_id:client_secret:name:type` entries joined with `|`.
    pub builtin_users: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: default_access_token_lifetime(),
            encryption_key_size: default_encryption_key_size(),
            builtin_users: None,
        }
    }
}

const fn default_access_token_lifetime() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

const fn default_encryption_key_size() -> usize {
    32
}
