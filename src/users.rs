mod api_ext;
mod builtin_user;
mod builtin_users_initializer;
mod client_credentials;
pub(crate) mod database_ext;
mod user;
mod user_id;
mod user_type;

pub use self::{
    api_ext::UserCreateParams,
    builtin_user::BuiltinUser,
    builtin_users_initializer::builtin_users_initializer,
    client_credentials::ClientCredentials,
    user::User,
    user_id::UserId,
    user_type::UserType,
};
