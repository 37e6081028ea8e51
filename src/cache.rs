mod cache_update;
mod credential_cache;

pub use self::{cache_update::CacheUpdate, credential_cache::CredentialCache};
use crate::{
    security::AccessToken,
    users::{User, UserId},
};

/// Active users keyed by id.
pub type UserCache = CredentialCache<UserId, User>;

/// Latest, non-expired access tokens keyed by the hash of the bearer value.
pub type AccessTokenCache = CredentialCache<String, AccessToken>;
