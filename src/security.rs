mod access_token;
mod api_ext;
mod credentials;
mod database_ext;
mod hashing;
mod issued_access_token;

pub use self::{
    access_token::AccessToken,
    api_ext::CLIENT_SECRET_SIZE_BYTES,
    credentials::Credentials,
    hashing::{generate_random_token, hash_sha256},
    issued_access_token::IssuedAccessToken,
};
