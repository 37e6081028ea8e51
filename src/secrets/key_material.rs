use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Per-secret key and nonce, hex-encoded. Lives only in the key vault, never next to the
/// ciphertext.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Same as the id of the secret the material belongs to.
    pub id: Uuid,
    pub key: String,
    pub iv: String,
}

impl Debug for KeyMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("id", &self.id)
            .field("key", &"***")
            .field("iv", &self.iv)
            .finish()
    }
}
