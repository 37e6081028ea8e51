use crate::{
    pagination::Pagination,
    secrets::Secret,
    security::AccessToken,
    user_groups::UserGroup,
    users::{User, UserId},
};
use futures::future::BoxFuture;
use std::collections::HashMap;
use uuid::Uuid;

/// Facade for the relational store that keeps users, access tokens, secrets, permissions and
/// groups. Mutating methods return the number of affected rows. Multi-statement operations run in
/// a single transaction.
pub trait RelationalStore: Sync + Send + 'static {
    /// Active users keyed by id.
    fn select_users_for_auth<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<HashMap<UserId, User>>>;
    fn list_users<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<Vec<User>>>;
    /// Retrieves an active user.
    fn get_user<'a>(&'a self, id: UserId) -> BoxFuture<'a, anyhow::Result<Option<User>>>;
    fn insert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Inserts the user or replaces its name, type and secret hash, re-activating it if needed.
    fn upsert_user<'a>(&'a self, user: &'a User) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Deprecates the latest access token of the user and soft-deletes the user in one
    /// transaction. Returns the number of deleted users and the id of the deprecated token.
    fn delete_user<'a>(
        &'a self,
        id: UserId,
    ) -> BoxFuture<'a, anyhow::Result<(u64, Option<String>)>>;
    fn rotate_user_secret<'a>(
        &'a self,
        id: UserId,
        client_secret_hash: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;

    /// Latest, non-expired access tokens keyed by id (the hash of the bearer value).
    fn select_access_tokens_for_auth<'a>(
        &'a self,
    ) -> BoxFuture<'a, anyhow::Result<HashMap<String, AccessToken>>>;
    /// Deprecates the latest token of `access_token.user_id` and inserts `access_token` in one
    /// transaction. Returns the id of the deprecated token, if there was one.
    fn rotate_access_token<'a>(
        &'a self,
        access_token: &'a AccessToken,
    ) -> BoxFuture<'a, anyhow::Result<Option<String>>>;

    fn insert_secret<'a>(&'a self, secret: &'a Secret) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Resolves an active secret for reading: the user is an admin, the creator, has a direct
    /// permission, or belongs to a group with a permission.
    fn get_secret_by_name<'a>(
        &'a self,
        user: &'a User,
        name: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Secret>>>;
    /// Resolves an active secret for writing: the user is an admin or the creator. Permissions
    /// never grant write access.
    fn get_secret_id_with_write_access<'a>(
        &'a self,
        user: &'a User,
        name: &'a str,
    ) -> BoxFuture<'a, anyhow::Result<Option<Uuid>>>;
    fn delete_secret<'a>(
        &'a self,
        id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Lists metadata of the active secrets readable by the user, ordered by name.
    fn list_secrets<'a>(
        &'a self,
        user: &'a User,
        pagination: Pagination,
    ) -> BoxFuture<'a, anyhow::Result<Vec<Secret>>>;

    fn insert_secret_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn delete_secret_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn insert_secret_group_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_group_id: Uuid,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn delete_secret_group_permission<'a>(
        &'a self,
        secret_id: Uuid,
        user_group_id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;

    fn insert_user_group<'a>(
        &'a self,
        user_group: &'a UserGroup,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn list_user_groups<'a>(&'a self) -> BoxFuture<'a, anyhow::Result<Vec<UserGroup>>>;
    fn get_user_group<'a>(&'a self, id: Uuid) -> BoxFuture<'a, anyhow::Result<Option<UserGroup>>>;
    fn delete_user_group<'a>(
        &'a self,
        id: Uuid,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn insert_user_group_member<'a>(
        &'a self,
        user_group_id: Uuid,
        user_id: UserId,
        created_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    fn delete_user_group_member<'a>(
        &'a self,
        user_group_id: Uuid,
        user_id: UserId,
        deleted_by: UserId,
    ) -> BoxFuture<'a, anyhow::Result<u64>>;
    /// Active members of an active group.
    fn list_users_in_group<'a>(
        &'a self,
        user_group_id: Uuid,
    ) -> BoxFuture<'a, anyhow::Result<Vec<User>>>;
}
