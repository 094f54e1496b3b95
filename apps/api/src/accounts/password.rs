//! Secret hashing for the `users` collection.
//!
//! New secrets are stored as Argon2id PHC strings. Anything that does not
//! look like a PHC string is a legacy cleartext secret written by the
//! browser-only version of the app; it still verifies, and the caller is told
//! to re-hash it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::storage::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Match,
    /// Matched a cleartext secret that should be replaced by a hash.
    LegacyMatch,
    Mismatch,
}

pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, stored: &str) -> Verification {
    if !is_hashed(stored) {
        return if stored == password {
            Verification::LegacyMatch
        } else {
            Verification::Mismatch
        };
    }

    match PasswordHash::new(stored) {
        // Params come from the PHC string, so any Argon2 instance verifies.
        Ok(parsed) if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok() =>
        {
            Verification::Match
        }
        _ => Verification::Mismatch,
    }
}

pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

#[cfg(not(test))]
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

// Unit tests hash a lot; keep the memory cost tiny.
#[cfg(test)]
fn hasher() -> Argon2<'static> {
    use argon2::{Algorithm, Params, Version};
    let params = Params::new(64, 1, 1, None).expect("valid test params");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_phc_string() {
        let a = hash_password("p1").unwrap();
        let b = hash_password("p1").unwrap();
        assert!(is_hashed(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_hashed_secret() {
        let hash = hash_password("p1").unwrap();
        assert_eq!(verify_password("p1", &hash), Verification::Match);
        assert_eq!(verify_password("p2", &hash), Verification::Mismatch);
    }

    #[test]
    fn test_verify_legacy_cleartext_secret() {
        assert_eq!(verify_password("p1", "p1"), Verification::LegacyMatch);
        assert_eq!(verify_password("p1", "p2"), Verification::Mismatch);
    }

    #[test]
    fn test_garbage_phc_string_never_matches() {
        assert_eq!(
            verify_password("$argon2id$broken", "$argon2id$broken"),
            Verification::Mismatch
        );
    }
}
