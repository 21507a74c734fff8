use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;

use super::errors::PasswordError;

/// Random salt length in bytes, before base64 encoding.
const SALT_BYTES: usize = 16;

/// PBKDF2 iteration count.
const ITERATIONS: u32 = 1000;

/// Derived key length in bytes, before base64 encoding.
const KEY_BYTES: usize = 64;

/// A freshly derived password hash together with the salt it was derived with.
///
/// Both fields are base64 text, ready to be stored next to the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword {
    pub hash: String,
    pub salt: String,
}

/// Password hashing implementation.
///
/// PBKDF2-HMAC-SHA512 with a random per-credential salt. The key derivation is
/// fed the base64 text of the salt, so hashes stay byte-compatible with records
/// that were written that way.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a new random salt.
    ///
    /// Two calls with the same password yield different salts and hashes.
    ///
    /// # Errors
    /// * `HashingFailed` - The OS random number generator is unavailable
    pub fn hash(&self, password: &str) -> Result<HashedPassword, PasswordError> {
        let mut salt = [0u8; SALT_BYTES];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        let salt = STANDARD.encode(salt);

        let hash = STANDARD.encode(derive(password, &salt));

        Ok(HashedPassword { hash, salt })
    }

    /// Verify a password against a stored hash and salt.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - The stored hash is not valid base64
    pub fn verify(&self, password: &str, hash: &str, salt: &str) -> Result<bool, PasswordError> {
        let stored = STANDARD
            .decode(hash)
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?;

        Ok(constant_time_eq(&stored, &derive(password, salt)))
    }
}

fn derive(password: &str, salt: &str) -> [u8; KEY_BYTES] {
    let mut key = [0u8; KEY_BYTES];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), ITERATIONS, &mut key);
    key
}

/// Byte comparison whose running time does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
