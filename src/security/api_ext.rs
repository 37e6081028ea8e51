use crate::{
    api::Api,
    error::Error as VaultError,
    security::{AccessToken, Credentials, IssuedAccessToken, generate_random_token, hash_sha256},
    users::{ClientCredentials, User, UserId},
};
use anyhow::Context;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Size of the raw access token value, in bytes.
const ACCESS_TOKEN_SIZE_BYTES: usize = 32;
/// Size of the raw client secret value, in bytes.
pub const CLIENT_SECRET_SIZE_BYTES: usize = 32;

pub struct SecurityApiExt<'a> {
    api: &'a Api,
}

impl<'a> SecurityApiExt<'a> {
    pub fn new(api: &'a Api) -> Self {
        Self { api }
    }

    /// Resolves credentials into an active user using the credential caches. Returns `None` if
    /// authentication fails for any reason; the reason is only logged.
    pub async fn authenticate(&self, credentials: &Credentials, check_admin: bool) -> Option<User> {
        let user = match credentials {
            Credentials::ClientSecret {
                client_id,
                client_secret,
            } => self.authenticate_client(client_id, client_secret).await?,
            Credentials::AccessToken(access_token) => {
                self.authenticate_access_token(access_token).await?
            }
        };

        if !user.is_active {
            warn!(user.id = %user.id, "Authentication failed: user is not active.");
            return None;
        }

        if check_admin && !user.is_admin() {
            warn!(user.id = %user.id, "Authentication failed: user is not an admin.");
            return None;
        }

        Some(user)
    }

    async fn authenticate_client(&self, client_id: &str, client_secret: &str) -> Option<User> {
        let Ok(user_id) = client_id.parse::<UserId>() else {
            warn!("Authentication failed: client id is not a valid UUID.");
            return None;
        };

        let Some(user) = self.api.users_cache.get(&user_id).await else {
            warn!(user.id = %user_id, "Authentication failed: unknown client id.");
            return None;
        };

        let client_secret_hash = hash_sha256(client_secret);
        if client_secret_hash.len() != user.client_secret_hash.len()
            || !openssl::memcmp::eq(
                client_secret_hash.as_bytes(),
                user.client_secret_hash.as_bytes(),
            )
        {
            warn!(user.id = %user_id, "Authentication failed: client secret doesn't match.");
            return None;
        }

        Some(user)
    }

    async fn authenticate_access_token(&self, access_token: &str) -> Option<User> {
        let Some(access_token) = self
            .api
            .access_tokens_cache
            .get(&hash_sha256(access_token))
            .await
        else {
            warn!("Authentication failed: unknown access token.");
            return None;
        };

        if !access_token.is_valid_at(OffsetDateTime::now_utc()) {
            warn!(user.id = %access_token.user_id, "Authentication failed: access token is expired.");
            return None;
        }

        let user = self.api.users_cache.get(&access_token.user_id).await;
        if user.is_none() {
            warn!(user.id = %access_token.user_id, "Authentication failed: access token owner is unknown.");
        }

        user
    }

    /// Issues a new access token for the user, deprecating the previous one. The caches are only
    /// updated once the token rotation is committed.
    pub async fn issue_access_token(&self, user: &User) -> anyhow::Result<IssuedAccessToken> {
        let token = generate_random_token(ACCESS_TOKEN_SIZE_BYTES)?;
        let access_token = AccessToken {
            id: hash_sha256(&token),
            user_id: user.id,
            invalid_at: OffsetDateTime::now_utc() + self.api.config.security.access_token_lifetime,
            is_latest: true,
        };

        let deprecated_access_token = self
            .api
            .store
            .rotate_access_token(&access_token)
            .await
            .with_context(|| format!("Failed to rotate access token for user ({}).", user.id))?;

        let cache = &self.api.access_tokens_cache;
        if let Some(deprecated_access_token) = deprecated_access_token {
            cache.delete(deprecated_access_token).await;
        }
        cache
            .add(access_token.id.clone(), access_token.clone())
            .await;
        cache.flush().await;

        info!(user.id = %user.id, "Issued access token.");

        Ok(IssuedAccessToken {
            token,
            user_id: access_token.user_id,
            invalid_at: access_token.invalid_at,
            is_latest: access_token.is_latest,
        })
    }

    /// Replaces the client secret of the user and returns the new credentials.
    pub async fn rotate_user_secret(&self, user: &User) -> anyhow::Result<ClientCredentials> {
        let client_secret = generate_random_token(CLIENT_SECRET_SIZE_BYTES)?;
        let client_secret_hash = hash_sha256(&client_secret);

        let rows_affected = self
            .api
            .store
            .rotate_user_secret(user.id, &client_secret_hash)
            .await
            .with_context(|| format!("Failed to rotate secret for user ({}).", user.id))?;
        if rows_affected == 0 {
            return Err(VaultError::not_found("User not found.").into());
        }

        self.api
            .users_cache
            .add(
                user.id,
                User {
                    client_secret_hash,
                    ..user.clone()
                },
            )
            .await;
        self.api.users_cache.flush().await;

        info!(user.id = %user.id, "Rotated client secret.");

        Ok(ClientCredentials {
            client_id: user.id,
            client_secret,
        })
    }
}

impl Api {
    /// Returns an API to authenticate clients and manage their credentials.
    pub fn security(&self) -> SecurityApiExt<'_> {
        SecurityApiExt::new(self)
    }
}
