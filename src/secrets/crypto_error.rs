use openssl::error::ErrorStack;

/// Errors produced while encrypting or decrypting secret values.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Encryption key size must be 16, 24 or 32 bytes, got {0} bytes.")]
    InvalidKeySize(usize),
    #[error("Failed to set up the cipher.")]
    Setup(#[from] ErrorStack),
    #[error("Failed to decrypt secret value.")]
    Decryption,
}
