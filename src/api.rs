use crate::{
    cache::{AccessTokenCache, UserCache},
    config::Config,
    database::RelationalStore,
    key_vault::KeyVault,
    security::AccessToken,
    users::{User, UserId},
};
use futures::future::BoxFuture;
use std::{collections::HashMap, sync::Arc};
use tokio_util::sync::CancellationToken;

/// Collection of the vault APIs: the stores, the credential caches and the configuration they run
/// with. Domain specific operations are exposed through the `*ApiExt` extensions.
#[derive(Clone)]
pub struct Api {
    pub config: Config,
    pub store: Arc<dyn RelationalStore>,
    pub key_vault: Arc<dyn KeyVault>,
    pub users_cache: UserCache,
    pub access_tokens_cache: AccessTokenCache,
}

impl Api {
    /// Instantiates APIs collection and loads the credential caches. The cache workers run until
    /// `shutdown` is cancelled.
    pub async fn start(
        config: Config,
        store: Arc<dyn RelationalStore>,
        key_vault: Arc<dyn KeyVault>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<Self> {
        let users_store = store.clone();
        let users_cache = UserCache::start(
            "users",
            move || -> BoxFuture<'static, anyhow::Result<HashMap<UserId, User>>> {
                let store = users_store.clone();
                Box::pin(async move { store.select_users_for_auth().await })
            },
            &config.cache,
            shutdown.clone(),
        )
        .await?;

        let access_tokens_store = store.clone();
        let access_tokens_cache = AccessTokenCache::start(
            "access_tokens",
            move || -> BoxFuture<'static, anyhow::Result<HashMap<String, AccessToken>>> {
                let store = access_tokens_store.clone();
                Box::pin(async move { store.select_access_tokens_for_auth().await })
            },
            &config.cache,
            shutdown,
        )
        .await?;

        Ok(Self {
            config,
            store,
            key_vault,
            users_cache,
            access_tokens_cache,
        })
    }
}
