//! Password hashing and session token helpers
//!
//! Passwords are stored as SHA-256(salt || password) with a random
//! per-user hex salt. Session tokens are opaque UUIDv4 strings.

use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const SALT_BYTES: usize = 16;

/// Generate a random hex salt
pub fn generate_salt() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; SALT_BYTES] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a password with the given salt, returning 64 hex characters
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Verify a password against a stored hash and salt
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

/// Generate a new opaque session token
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip_verifies() {
        let salt = generate_salt();
        let hash = hash_password("SuperTestPass123", &salt);
        assert!(verify_password("SuperTestPass123", &salt, &hash));
        assert!(!verify_password("wrong", &salt, &hash));
    }

    #[test]
    fn salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn hash_is_sixty_four_hex_chars() {
        let hash = hash_password("x", "y");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_password_different_salt_differs() {
        let h1 = hash_password("pw", "salt-a");
        let h2 = hash_password("pw", "salt-b");
        assert_ne!(h1, h2);
    }
}
