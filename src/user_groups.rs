mod api_ext;
mod database_ext;
mod user_group;

pub use self::{
    api_ext::{UserGroupCreateParams, UserGroupMemberParams},
    user_group::UserGroup,
};
