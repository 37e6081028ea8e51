use crate::{
    api::Api,
    error::Error as VaultError,
    security::{CLIENT_SECRET_SIZE_BYTES, generate_random_token, hash_sha256},
    users::{BuiltinUser, ClientCredentials, User, UserId, UserType},
};
use anyhow::Context;
use serde_derive::Deserialize;
use tracing::info;

/// Maximum length for a user name.
const MAX_USER_NAME_LENGTH: usize = 128;

/// Parameters of a new user.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserCreateParams {
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: String,
}

pub struct UsersApiExt<'a> {
    api: &'a Api,
}

impl<'a> UsersApiExt<'a> {
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Lists all active users.
    pub async fn list(&self) -> anyhow::Result<Vec<User>> {
        self.api.store.list_users().await
    }

    /// Retrieves an active user by id.
    pub async fn get(&self, id: UserId) -> anyhow::Result<Option<User>> {
        self.api.store.get_user(id).await
    }

    /// Creates a new user and returns its client credentials, the only time the client secret is
    /// exposed.
    pub async fn create(&self, params: UserCreateParams) -> anyhow::Result<ClientCredentials> {
        let name = params.name.trim();
        if name.is_empty() || name.len() > MAX_USER_NAME_LENGTH {
            return Err(VaultError::client(format!(
                "User name cannot be empty or longer than {MAX_USER_NAME_LENGTH} characters."
            ))
            .into());
        }

        let user_type = params
            .user_type
            .parse::<UserType>()
            .map_err(VaultError::client_with_root_cause)?;

        let client_secret = generate_random_token(CLIENT_SECRET_SIZE_BYTES)?;
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            user_type,
            is_active: true,
            client_secret_hash: hash_sha256(&client_secret),
        };

        self.api
            .store
            .insert_user(&user)
            .await
            .with_context(|| format!("Failed to create user ({}).", user.id))?;

        self.api.users_cache.add(user.id, user.clone()).await;
        self.api.users_cache.flush().await;

        info!(user.id = %user.id, "Created {} user.", user.user_type.as_str());

        Ok(ClientCredentials {
            client_id: user.id,
            client_secret,
        })
    }

    /// Deactivates the user along with its latest access token, and evicts both from the caches.
    pub async fn delete(&self, id: UserId) -> anyhow::Result<()> {
        let (rows_affected, deprecated_access_token) = self
            .api
            .store
            .delete_user(id)
            .await
            .with_context(|| format!("Failed to delete user ({id})."))?;

        if let Some(deprecated_access_token) = deprecated_access_token {
            self.api
                .access_tokens_cache
                .delete(deprecated_access_token)
                .await;
            self.api.access_tokens_cache.flush().await;
        }
        self.api.users_cache.delete(id).await;
        self.api.users_cache.flush().await;

        if rows_affected == 0 {
            return Err(VaultError::not_found("User not found.").into());
        }

        info!(user.id = %id, "Deleted user.");

        Ok(())
    }

    /// Inserts or updates a builtin user.
    pub async fn upsert_builtin(&self, builtin_user: BuiltinUser) -> anyhow::Result<User> {
        let user = builtin_user.into_user();
        self.api
            .store
            .upsert_user(&user)
            .await
            .with_context(|| format!("Failed to upsert builtin user ({}).", user.id))?;

        self.api.users_cache.add(user.id, user.clone()).await;
        self.api.users_cache.flush().await;

        Ok(user)
    }
}

impl Api {
    /// Returns an API to work with users.
    pub fn users(&self) -> UsersApiExt<'_> {
        UsersApiExt::new(self)
    }
}
