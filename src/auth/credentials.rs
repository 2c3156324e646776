//! Password digests
//!
//! Stored passwords use the format
//! `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`: PBKDF2-HMAC-SHA256
//! under a random per-user salt. Anything not in that format is a legacy
//! plaintext password and is still accepted.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::{Digest, Sha256};

const SCHEME: &str = "pbkdf2-sha256";

/// Salt byte length for password hashing.
const SALT_BYTES: usize = 16;

/// Derived key length (one SHA-256 block).
const HASH_BYTES: usize = 32;

/// Salt used for the dummy computation on unknown users.
const DUMMY_SALT: [u8; SALT_BYTES] = [0u8; SALT_BYTES];

/// Derives password digests for newly stored users.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    /// Hashes `password` under a fresh random salt.
    pub fn digest(&self, password: &str) -> String {
        let salt = generate_salt();
        let hash = derive(password, &salt, self.iterations);
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(hash)
        )
    }

    /// Burns roughly the cost of one verification so an unknown username
    /// is not distinguishable by timing.
    pub fn dummy_verify(&self, password: &str) {
        let _ = derive(password, &DUMMY_SALT, self.iterations);
    }
}

/// Checks `password` against a stored digest (or legacy plaintext value).
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse_digest(stored) {
        Some(parsed) => {
            let attempt = derive(password, &parsed.salt, parsed.iterations);
            constant_time_eq(&attempt, &parsed.hash)
        }
        // Compare digests so the plaintext's length does not leak.
        None => constant_time_eq(
            &Sha256::digest(password.as_bytes()),
            &Sha256::digest(stored.as_bytes()),
        ),
    }
}

struct ParsedDigest {
    iterations: u32,
    salt: Vec<u8>,
    hash: [u8; HASH_BYTES],
}

fn parse_digest(stored: &str) -> Option<ParsedDigest> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations = parts.next()?.parse::<u32>().ok().filter(|n| *n > 0)?;
    let salt = hex::decode(parts.next()?).ok().filter(|s| !s.is_empty())?;
    let hash: [u8; HASH_BYTES] = hex::decode(parts.next()?).ok()?.try_into().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ParsedDigest {
        iterations,
        salt,
        hash,
    })
}

fn generate_salt() -> [u8; SALT_BYTES] {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes
}

/// PBKDF2-HMAC-SHA256 of `password` under `salt`.
fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_BYTES] {
    let mut hash = [0u8; HASH_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);
    hash
}

/// Byte comparison whose timing does not depend on where inputs differ.
/// Callers pass fixed-length digests.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    (a.len() == b.len()) & (diff == 0)
}
