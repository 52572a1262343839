use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest.
pub const IDENTITY_HASH_LEN: usize = 16;

/// First 16 hex chars of the SHA-256 of `input`.
pub fn short_digest(input: &str) -> String {
    let mut hex = hex::encode(Sha256::digest(input.as_bytes()));
    hex.truncate(IDENTITY_HASH_LEN);
    hex
}

/// Stable identity of a record: a pure function of the lowercased canonical
/// title and URL, independent of source and timestamp.
pub fn identity_hash(canonical_title: &str, canonical_url: &str) -> String {
    short_digest(&format!(
        "{}|{}",
        canonical_title.to_lowercase(),
        canonical_url.to_lowercase()
    ))
}
