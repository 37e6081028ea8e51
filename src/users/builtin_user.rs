use crate::{
    security::hash_sha256,
    users::{User, UserId, UserType},
};
use anyhow::{Context, bail};

/// User declared in the configuration and upserted at start-up.
#[derive(Debug, Clone)]
pub struct BuiltinUser {
    pub id: UserId,
    pub name: String,
    pub user_type: UserType,
    pub client_secret_hash: String,
}

impl BuiltinUser {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            user_type: self.user_type,
            is_active: true,
            client_secret_hash: self.client_secret_hash,
        }
    }
}

impl TryFrom<&str> for BuiltinUser {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let user_properties = value.split(':').map(str::trim).collect::<Vec<_>>();
        let [client_id, client_secret, name, user_type] = user_properties[..] else {
            bail!("Builtin user is malformed.");
        };
        if client_id.is_empty() || client_secret.is_empty() || name.is_empty() {
            bail!("Builtin user cannot have empty client id, client secret, or name.");
        }

        Ok(BuiltinUser {
            id: client_id
                .parse()
                .with_context(|| "Builtin user client id is not a valid UUID.")?,
            name: name.to_string(),
            user_type: user_type.parse()?,
            client_secret_hash: hash_sha256(client_secret),
        })
    }
}
