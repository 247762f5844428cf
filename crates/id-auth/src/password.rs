//! One-way password hashing and verification.

use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// bcrypt hasher with a fixed work factor.
///
/// The cost is process-wide configuration, set once at construction.
/// Hashes are salted by bcrypt itself; two hashes of the same password
/// never compare equal as strings.
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. The plaintext is borrowed and dropped by
    /// the caller; it is never stored.
    #[track_caller]
    pub fn hash(&self, plaintext: &str) -> AuthErrorResult<String> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| AuthError::Hash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Compare a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on any mismatch. bcrypt performs the comparison
    /// in constant time. Errors only when the stored hash is malformed,
    /// which is a precondition violation, not a failed login.
    #[track_caller]
    pub fn verify(&self, plaintext: &str, hash: &str) -> AuthErrorResult<bool> {
        bcrypt::verify(plaintext, hash).map_err(|e| AuthError::InvalidHash {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
