use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash at default cost that no password produces.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Qx7tutVozbovxrK2qtldAg$5dk+Eux/GJI1pilQYobhy/T+oHu/T8zlUHL8GIY5Ebw";

/// One-way credential codec.
///
/// Hashes are Argon2id PHC strings, so algorithm, cost parameters and salt
/// travel with the hash and verification needs nothing else.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with Argon2id defaults
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant time. A hash that cannot be parsed
    /// is reported as a mismatch.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run a full verification against a decoy hash and report a mismatch.
    ///
    /// Used when there is no stored hash to check, so a missing account costs
    /// the same as a wrong password.
    pub fn verify_decoy(&self, password: &str) -> bool {
        std::hint::black_box(self.verify(password, DECOY_HASH));
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hash_is_self_describing() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("secret123").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m="));
        assert!(!hash.contains("secret123"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("secret123").expect("Failed to hash password");
        let second = hasher.hash("secret123").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first));
        assert!(hasher.verify("secret123", &second));
    }

    #[test]
    fn test_verify_malformed_hash_is_mismatch() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify("password", "invalid_hash"));
        assert!(!hasher.verify("password", ""));
        assert!(!hasher.verify("password", "$argon2id$v=19$broken"));
    }

    #[test]
    fn test_decoy_hash_uses_default_cost() {
        let decoy = PasswordHash::new(DECOY_HASH).expect("Decoy hash must parse");
        let stored = PasswordHasher::new()
            .hash("secret123")
            .expect("Failed to hash password");
        let stored = PasswordHash::new(&stored).expect("Failed to parse hash");

        assert_eq!(decoy.algorithm, stored.algorithm);
        assert_eq!(decoy.version, stored.version);
        assert_eq!(decoy.params, stored.params);
        assert!(decoy.hash.is_some());
    }

    #[test]
    fn test_verify_decoy_never_matches() {
        let hasher = PasswordHasher::new();

        assert!(!hasher.verify_decoy("secret123"));
        assert!(!hasher.verify_decoy(""));
    }
}
