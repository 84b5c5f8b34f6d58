//! Password hashing using bcrypt.

use crate::shared::AppError;

/// Work factor for stored credentials. Lowering it is only acceptable in
/// tests, via [`BcryptPasswordHasher::with_cost`].
pub const HASH_COST: u32 = 14;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password for storage
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    /// Verifies a candidate password against a stored hash.
    ///
    /// Returns false for a mismatch and for a malformed stored hash; a bad
    /// row in the database must read as a failed login, not a server error.
    fn verify(&self, candidate: &str, stored_hash: &str) -> bool;
}

/// Bcrypt-based password hasher
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self { cost: HASH_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        // Fails only if the OS RNG does, which has to abort the operation.
        bcrypt::hash(plaintext, self.cost).map_err(|e| AppError::Hash(e.to_string()))
    }

    fn verify(&self, candidate: &str, stored_hash: &str) -> bool {
        bcrypt::verify(candidate, stored_hash).unwrap_or(false)
    }
}
