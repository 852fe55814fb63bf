//! Cryptographic utilities for invitation secret generation and hashing.
//!
//! Invitation secrets are high-entropy one-time values handed to a recipient
//! out of band. Only the SHA-256 digest of a secret is ever stored; lookups
//! go through [`digest_secret`], never raw comparison.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in an invitation secret (256 bits of entropy).
const SECRET_BYTES: usize = 32;

/// Generates a new invitation secret as a 64-character lowercase hex string.
///
/// Uses the operating system's CSPRNG. The raw value must never be written
/// to durable storage.
pub fn generate_invite_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Computes the SHA-256 digest of a secret and returns it as a hex string.
///
/// The digest is the only form of the secret that is persisted.
pub fn digest_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
