mod secrets;
mod security;
mod user_groups;
mod users;
mod version_get;

pub use self::{
    secrets::{
        secrets_create, secrets_delete, secrets_get, secrets_list, secrets_permissions_grant,
        secrets_permissions_revoke,
    },
    security::{security_access_token, security_rotate_secret},
    user_groups::{
        user_groups_create, user_groups_delete, user_groups_get, user_groups_list,
        user_groups_members_add, user_groups_members_list, user_groups_members_remove,
    },
    users::{users_access_logs, users_create, users_delete, users_get, users_list},
    version_get::version_get,
};
