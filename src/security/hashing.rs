use anyhow::bail;

/// Hashes a credential value one-way, returning `sha256:<hex>`.
pub fn hash_sha256(value: &str) -> String {
    format!(
        "sha256:{}",
        hex::encode(openssl::sha::sha256(value.as_bytes()))
    )
}

/// Generates `size` cryptographically random bytes and returns them hex-encoded.
pub fn generate_random_token(size: usize) -> anyhow::Result<String> {
    if size == 0 {
        bail!("Random token size must be greater than zero.");
    }

    let mut bytes = vec![0u8; size];
    openssl::rand::rand_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}
