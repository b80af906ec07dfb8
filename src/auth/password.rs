//! Password hashing and verification.

use anyhow::{Context, Result};
use tracing::warn;

/// Default bcrypt cost: keep debug builds fast, release builds slow on
/// purpose.
pub fn default_cost() -> u32 {
    if cfg!(debug_assertions) { 4 } else { 10 }
}

/// Hash a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("hashing password")
}

/// Verify a password against a bcrypt hash.
///
/// Fails closed: a malformed or corrupted hash yields `false` rather than an
/// error, so a storage problem can never bypass the caller's rejection path.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("password verification failed on malformed hash: {:?}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password", 4).unwrap();
        let second = hash_password("same password", 4).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same password", &first));
        assert!(verify_password("same password", &second));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$2b$99$corrupted"));
    }
}
