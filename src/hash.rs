use sha2::{Digest, Sha256};

/// SHA-256 digest of `bytes`, hex encoded.
///
/// This is the canonical content identity used for dedup and correlation
/// downstream; callers must feed it the bytes read back from disk, not
/// the upload buffer.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
