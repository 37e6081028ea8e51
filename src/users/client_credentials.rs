use crate::users::UserId;
use serde_derive::Serialize;

/// Client credentials returned exactly once, when a user is created or its secret is rotated.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: UserId,
    pub client_secret: String,
}
