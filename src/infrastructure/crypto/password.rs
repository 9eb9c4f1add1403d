//! Password hashing utilities

use bcrypt::{hash, verify};

/// Work factor used when none is configured.
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// Work factor bounds accepted by bcrypt.
pub const MIN_PASSWORD_COST: u32 = 4;
pub const MAX_PASSWORD_COST: u32 = 31;

/// Hash a password using bcrypt with the given work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}
