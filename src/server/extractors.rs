mod credentials;
mod identity;

pub use self::identity::{AdminIdentity, AdminTokenIdentity, ClientIdentity, TokenIdentity};
