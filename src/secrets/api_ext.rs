use crate::{
    access_logs::{AccessLog, AccessLogAction},
    api::Api,
    error::Error as VaultError,
    pagination::Pagination,
    secrets::{DecryptedSecret, PermissionGrantee, Secret, decrypt_secret, encrypt_secret},
    users::User,
};
use anyhow::Context;
use serde_derive::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Maximum length for a secret name.
const MAX_SECRET_NAME_LENGTH: usize = 128;
/// Maximum length for a secret value (10 KB).
const MAX_SECRET_VALUE_LENGTH: usize = 10 * 1024;
/// Maximum length for a secret description.
const MAX_SECRET_DESCRIPTION_LENGTH: usize = 1024;

/// Parameters of a new secret.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SecretCreateParams {
    pub name: String,
    pub value: String,
    pub description: Option<String>,
}

pub struct SecretsApiExt<'a, 'u> {
    api: &'a Api,
    user: &'u User,
}

impl<'a, 'u> SecretsApiExt<'a, 'u> {
    pub fn new(api: &'a Api, user: &'u User) -> Self {
        Self { api, user }
    }

    /// Lists metadata of the secrets the user can read.
    pub async fn list(&self, pagination: Pagination) -> anyhow::Result<Vec<Secret>> {
        self.api.store.list_secrets(self.user, pagination).await
    }

    /// Encrypts and stores a new secret. Key material goes to the key vault first, so a stored
    /// secret never lacks its key.
    pub async fn create(&self, params: SecretCreateParams) -> anyhow::Result<Secret> {
        Self::validate_name(&params.name)?;
        Self::validate_value(&params.value)?;
        Self::validate_description(params.description.as_deref())?;

        let id = Uuid::now_v7();
        let (ciphertext, key_material) = encrypt_secret(
            id,
            &params.value,
            self.api.config.security.encryption_key_size,
        )?;

        self.api
            .key_vault
            .insert_key_material(&key_material)
            .await
            .with_context(|| format!("Failed to store key material for secret ({id})."))?;

        let secret = Secret {
            id,
            name: params.name,
            value: Some(ciphertext),
            description: params.description,
            created_by: self.user.id,
            updated_by: self.user.id,
        };
        self.api
            .store
            .insert_secret(&secret)
            .await
            .with_context(|| format!("Failed to store secret ({id})."))?;

        self.log_access(AccessLogAction::Create, &secret.name)
            .await?;

        info!(user.id = %self.user.id, secret.name = %secret.name, "Created secret.");

        Ok(Secret {
            value: None,
            ..secret
        })
    }

    /// Retrieves and decrypts a secret the user can read.
    pub async fn get(&self, name: &str) -> anyhow::Result<DecryptedSecret> {
        let secret = self
            .api
            .store
            .get_secret_by_name(self.user, name)
            .await?
            .ok_or_else(|| secret_not_found(name))?;

        let key_material = self
            .api
            .key_vault
            .get_key_material(secret.id)
            .await?
            .with_context(|| format!("Key material for secret ({}) is missing.", secret.id))?;
        let ciphertext = secret
            .value
            .as_deref()
            .with_context(|| format!("Secret ({}) has no value.", secret.id))?;
        let value = decrypt_secret(ciphertext, &key_material)
            .with_context(|| format!("Failed to decrypt secret ({}).", secret.id))?;

        self.log_access(AccessLogAction::Read, &secret.name).await?;

        Ok(DecryptedSecret {
            name: secret.name,
            value,
            description: secret.description,
        })
    }

    /// Deletes a secret the user can modify.
    pub async fn delete(&self, name: &str) -> anyhow::Result<()> {
        let secret_id = self.get_secret_id_with_write_access(name).await?;
        if self
            .api
            .store
            .delete_secret(secret_id, self.user.id)
            .await?
            == 0
        {
            return Err(secret_not_found(name).into());
        }

        self.log_access(AccessLogAction::Delete, name).await?;

        info!(user.id = %self.user.id, secret.name = %name, "Deleted secret.");

        Ok(())
    }

    /// Grants a user or a user group read access to a secret the user can modify.
    pub async fn grant(&self, name: &str, grantee: PermissionGrantee) -> anyhow::Result<()> {
        let secret_id = self.get_secret_id_with_write_access(name).await?;
        let store = &self.api.store;
        match grantee {
            PermissionGrantee::User(user_id) => {
                store
                    .insert_secret_permission(secret_id, user_id, self.user.id)
                    .await?
            }
            PermissionGrantee::UserGroup(user_group_id) => {
                store
                    .insert_secret_group_permission(secret_id, user_group_id, self.user.id)
                    .await?
            }
        };

        self.log_access(AccessLogAction::Grant, name).await?;

        info!(user.id = %self.user.id, secret.name = %name, "Granted {grantee:?} access to secret.");

        Ok(())
    }

    /// Revokes a read permission previously granted on a secret the user can modify.
    pub async fn revoke(&self, name: &str, grantee: PermissionGrantee) -> anyhow::Result<()> {
        let secret_id = self.get_secret_id_with_write_access(name).await?;
        let store = &self.api.store;
        let rows_affected = match grantee {
            PermissionGrantee::User(user_id) => {
                store
                    .delete_secret_permission(secret_id, user_id, self.user.id)
                    .await?
            }
            PermissionGrantee::UserGroup(user_group_id) => {
                store
                    .delete_secret_group_permission(secret_id, user_group_id, self.user.id)
                    .await?
            }
        };
        if rows_affected == 0 {
            return Err(VaultError::not_found("Permission not found.").into());
        }

        self.log_access(AccessLogAction::Revoke, name).await?;

        info!(user.id = %self.user.id, secret.name = %name, "Revoked {grantee:?} access to secret.");

        Ok(())
    }

    async fn get_secret_id_with_write_access(&self, name: &str) -> anyhow::Result<Uuid> {
        self.api
            .store
            .get_secret_id_with_write_access(self.user, name)
            .await?
            .ok_or_else(|| secret_not_found(name).into())
    }

    async fn log_access(&self, action: AccessLogAction, name: &str) -> anyhow::Result<()> {
        self.api
            .key_vault
            .log_access(&AccessLog::now(self.user.id, action, name))
            .await
            .with_context(|| format!("Failed to log `{}` access to secret.", action.as_str()))?;
        Ok(())
    }

    fn validate_name(name: &str) -> anyhow::Result<()> {
        if !is_valid_secret_name(name) {
            return Err(VaultError::client(format!(
                "Secret name must start with a letter, contain only alphanumeric characters, \
                 underscores, or hyphens, and be at most {MAX_SECRET_NAME_LENGTH} characters."
            ))
            .into());
        }
        Ok(())
    }

    fn validate_value(value: &str) -> anyhow::Result<()> {
        if value.is_empty() || value.len() > MAX_SECRET_VALUE_LENGTH {
            return Err(VaultError::client(format!(
                "Secret value cannot be empty or longer than {MAX_SECRET_VALUE_LENGTH} bytes."
            ))
            .into());
        }
        Ok(())
    }

    fn validate_description(description: Option<&str>) -> anyhow::Result<()> {
        if description.is_some_and(|description| description.len() > MAX_SECRET_DESCRIPTION_LENGTH)
        {
            return Err(VaultError::client(format!(
                "Secret description must be at most {MAX_SECRET_DESCRIPTION_LENGTH} characters."
            ))
            .into());
        }
        Ok(())
    }
}

fn is_valid_secret_name(name: &str) -> bool {
    if name.len() > MAX_SECRET_NAME_LENGTH {
        return false;
    }

    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Same error whether the secret is missing or just invisible to the user.
fn secret_not_found(name: &str) -> VaultError {
    VaultError::not_found(format!("Secret `{name}` not found."))
}

impl Api {
    /// Returns an API to work with secrets on behalf of the user.
    pub fn secrets<'a, 'u>(&'a self, user: &'u User) -> SecretsApiExt<'a, 'u> {
        SecretsApiExt::new(self, user)
    }
}
