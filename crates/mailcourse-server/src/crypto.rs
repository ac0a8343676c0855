use std::num::NonZeroU32;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::util::{hex_decode, hex_encode, random_bytes};

const OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 16;
const SCHEME: &str = "pbkdf2-sha256";

/// Derive the stored password hash.
///
/// Passwords are stretched with PBKDF2-HMAC-SHA256 over a random per-user salt.
/// The round count travels inside the encoded string, so it can be raised later
/// without invalidating existing credentials.
pub fn hash_password(secret: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut out = vec![0u8; OUTPUT_LEN];
    let iterations = NonZeroU32::new(iterations).expect("Iterations must be non-zero");
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    out
}

pub fn verify_password_hash(secret: &[u8], salt: &[u8], expected: &[u8], iterations: u32) -> bool {
    let iterations = NonZeroU32::new(iterations).expect("Iterations must be non-zero");
    if expected.len() != OUTPUT_LEN {
        return false;
    }

    // Derive and constant-time compare.
    let mut out = vec![0u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    subtle::ConstantTimeEq::ct_eq(out.as_ref(), expected).into()
}

/// Hash a new password into the storage format
/// `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`.
pub fn encode_password(password: &str, iterations: u32) -> String {
    let salt = random_bytes(SALT_LEN);
    let hash = hash_password(password.as_bytes(), &salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        hex_encode(&salt),
        hex_encode(&hash)
    )
}

/// Check a login attempt against a stored encoded hash.
///
/// Unknown schemes and malformed fields verify as false rather than erroring,
/// so a corrupt row reads as a failed login.
pub fn verify_encoded_password(password: &str, encoded: &str) -> bool {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let (Some(salt), Some(hash)) = (hex_decode(salt), hex_decode(hash)) else {
        return false;
    };
    verify_password_hash(password.as_bytes(), &salt, &hash, iterations)
}
