use crate::{error::Error as VaultError, users::UserId};
use serde_derive::Deserialize;
use uuid::Uuid;

/// Recipient of a read permission on a secret.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PermissionGrantee {
    User(UserId),
    UserGroup(Uuid),
}

/// Raw grantee as sent by the client, exactly one of the fields must be set.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PermissionGranteeParams {
    pub user_id: Option<UserId>,
    pub user_group_id: Option<Uuid>,
}

impl TryFrom<PermissionGranteeParams> for PermissionGrantee {
    type Error = anyhow::Error;

    fn try_from(params: PermissionGranteeParams) -> Result<Self, Self::Error> {
        match (params.user_id, params.user_group_id) {
            (Some(user_id), None) => Ok(Self::User(user_id)),
            (None, Some(user_group_id)) => Ok(Self::UserGroup(user_group_id)),
            _ => Err(VaultError::client(
                "Exactly one of `user_id` or `user_group_id` must be provided.",
            )
            .into()),
        }
    }
}
