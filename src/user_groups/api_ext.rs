use crate::{
    api::Api,
    error::Error as VaultError,
    user_groups::UserGroup,
    users::{User, UserId},
};
use serde_derive::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Maximum length for a user group name.
const MAX_USER_GROUP_NAME_LENGTH: usize = 128;

/// Parameters of a new user group.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserGroupCreateParams {
    pub name: String,
}

/// User to add to or remove from a group.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserGroupMemberParams {
    pub user_id: UserId,
}

pub struct UserGroupsApiExt<'a, 'u> {
    api: &'a Api,
    user: &'u User,
}

impl<'a, 'u> UserGroupsApiExt<'a, 'u> {
    pub fn new(api: &'a Api, user: &'u User) -> Self {
        Self { api, user }
    }

    pub async fn list(&self) -> anyhow::Result<Vec<UserGroup>> {
        self.api.store.list_user_groups().await
    }

    pub async fn get(&self, id: Uuid) -> anyhow::Result<Option<UserGroup>> {
        self.api.store.get_user_group(id).await
    }

    pub async fn create(&self, params: UserGroupCreateParams) -> anyhow::Result<UserGroup> {
        let name = params.name.trim();
        if name.is_empty() || name.len() > MAX_USER_GROUP_NAME_LENGTH {
            return Err(VaultError::client(format!(
                "User group name cannot be empty or longer than {MAX_USER_GROUP_NAME_LENGTH} \
                 characters."
            ))
            .into());
        }

        let user_group = UserGroup {
            id: Uuid::now_v7(),
            name: name.to_string(),
            created_by: self.user.id,
            updated_by: self.user.id,
        };
        self.api.store.insert_user_group(&user_group).await?;

        info!(user.id = %self.user.id, user_group.id = %user_group.id, "Created user group.");

        Ok(user_group)
    }

    pub async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        if self.api.store.delete_user_group(id, self.user.id).await? == 0 {
            return Err(user_group_not_found().into());
        }

        info!(user.id = %self.user.id, user_group.id = %id, "Deleted user group.");

        Ok(())
    }

    pub async fn add_member(
        &self,
        user_group_id: Uuid,
        params: UserGroupMemberParams,
    ) -> anyhow::Result<()> {
        if self.api.store.get_user(params.user_id).await?.is_none() {
            return Err(VaultError::not_found("User not found.").into());
        }

        if self
            .api
            .store
            .insert_user_group_member(user_group_id, params.user_id, self.user.id)
            .await?
            == 0
        {
            return Err(user_group_not_found().into());
        }

        info!(
            user.id = %self.user.id,
            user_group.id = %user_group_id,
            "Added user ({}) to user group.",
            params.user_id
        );

        Ok(())
    }

    pub async fn remove_member(
        &self,
        user_group_id: Uuid,
        params: UserGroupMemberParams,
    ) -> anyhow::Result<()> {
        if self
            .api
            .store
            .delete_user_group_member(user_group_id, params.user_id, self.user.id)
            .await?
            == 0
        {
            return Err(VaultError::not_found("User group member not found.").into());
        }

        info!(
            user.id = %self.user.id,
            user_group.id = %user_group_id,
            "Removed user ({}) from user group.",
            params.user_id
        );

        Ok(())
    }

    /// Lists active members of an active group.
    pub async fn list_members(&self, user_group_id: Uuid) -> anyhow::Result<Vec<User>> {
        if self.get(user_group_id).await?.is_none() {
            return Err(user_group_not_found().into());
        }

        self.api.store.list_users_in_group(user_group_id).await
    }
}

fn user_group_not_found() -> VaultError {
    VaultError::not_found("User group not found.")
}

impl Api {
    /// Returns an API to work with user groups on behalf of the user.
    pub fn user_groups<'a, 'u>(&'a self, user: &'u User) -> UserGroupsApiExt<'a, 'u> {
        UserGroupsApiExt::new(self, user)
    }
}
