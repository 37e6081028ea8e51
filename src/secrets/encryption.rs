use crate::secrets::{CryptoError, KeyMaterial};
use openssl::symm::{Cipher, decrypt_aead, encrypt_aead};
use uuid::Uuid;

/// AES-GCM authentication tag size in bytes.
const TAG_SIZE: usize = 16;

/// Encrypts `plaintext` with a fresh random key of `key_size` bytes using AES-GCM.
///
/// The nonce is generated with the same length as the key. Previously stored secrets were
/// encrypted with that coupling and `decrypt_secret` relies on the stored iv length, so the nonce
/// size must not be changed independently of `key_size`.
///
/// Returns the hex-encoded `ciphertext || tag` and the key material to store in the key vault.
pub fn encrypt_secret(
    id: Uuid,
    plaintext: &str,
    key_size: usize,
) -> Result<(String, KeyMaterial), CryptoError> {
    let cipher = cipher_for_key_size(key_size)?;

    let mut key = vec![0u8; key_size];
    openssl::rand::rand_bytes(&mut key)?;
    let mut nonce = vec![0u8; key_size];
    openssl::rand::rand_bytes(&mut nonce)?;

    let mut tag = [0u8; TAG_SIZE];
    let mut ciphertext = encrypt_aead(
        cipher,
        &key,
        Some(&nonce),
        &[],
        plaintext.as_bytes(),
        &mut tag,
    )?;
    ciphertext.extend_from_slice(&tag);

    Ok((
        hex::encode(ciphertext),
        KeyMaterial {
            id,
            key: hex::encode(key),
            iv: hex::encode(nonce),
        },
    ))
}

/// Decrypts a value produced by [`encrypt_secret`]. The nonce size is taken from the length of
/// `key_material.iv`.
pub fn decrypt_secret(ciphertext: &str, key_material: &KeyMaterial) -> Result<String, CryptoError> {
    let key = hex::decode(&key_material.key).map_err(|_| CryptoError::Decryption)?;
    let nonce = hex::decode(&key_material.iv).map_err(|_| CryptoError::Decryption)?;
    let data = hex::decode(ciphertext).map_err(|_| CryptoError::Decryption)?;
    if data.len() < TAG_SIZE {
        return Err(CryptoError::Decryption);
    }

    let cipher = cipher_for_key_size(key.len())?;
    let (data, tag) = data.split_at(data.len() - TAG_SIZE);
    let plaintext = decrypt_aead(cipher, &key, Some(&nonce), &[], data, tag)
        .map_err(|_| CryptoError::Decryption)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
}

fn cipher_for_key_size(key_size: usize) -> Result<Cipher, CryptoError> {
    match key_size {
        16 => Ok(Cipher::aes_128_gcm()),
        24 => Ok(Cipher::aes_192_gcm()),
        32 => Ok(Cipher::aes_256_gcm()),
        _ => Err(CryptoError::InvalidKeySize(key_size)),
    }
}
