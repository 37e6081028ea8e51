use serde_derive::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Configuration for the in-memory credential caches.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Interval between full reloads from the relational store. Default is 60 seconds.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: Duration,
    /// Capacity of the bounded update queue. Default is 10.
    #[serde(default = "default_update_queue_capacity")]
    pub update_queue_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            update_queue_capacity: default_update_queue_capacity(),
        }
    }
}

const fn default_refresh_interval() -> Duration {
    Duration::from_secs(60)
}

const fn default_update_queue_capacity() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::CacheConfig;
    use insta::assert_toml_snapshot;
    use std::time::Duration;

    #[test]
    fn serialization_and_default() {
        assert_toml_snapshot!(CacheConfig::default(), @r###"
        refresh_interval = 60000
        update_queue_capacity = 10
        "###);
    }

    #[test]
    fn deserialization() {
        let config: CacheConfig = toml::from_str(
            r#"
        refresh_interval = 5000
    "#,
        )
        .unwrap();
        assert_eq!(
            config,
            CacheConfig {
                refresh_interval: Duration::from_secs(5),
                update_queue_capacity: 10,
            }
        );
    }
}
