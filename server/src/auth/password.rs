use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a password. Deterministic: the same input always
/// produces the same 64-character digest.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
