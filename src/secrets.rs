mod api_ext;
mod crypto_error;
mod database_ext;
mod encryption;
mod key_material;
mod permission_grantee;
mod secret;

pub use self::{
    api_ext::SecretCreateParams,
    crypto_error::CryptoError,
    encryption::{decrypt_secret, encrypt_secret},
    key_material::KeyMaterial,
    permission_grantee::{PermissionGrantee, PermissionGranteeParams},
    secret::{DecryptedSecret, Secret},
};
