// crates/hive-authz/src/access_key.rs
// ============================================================================
// Module: Organization Access Keys
// Description: Codec, creation, and verification of `hvo1/` access keys.
// Purpose: Identify organization access tokens and check their secrets.
// Dependencies: base64, rand, sha2, subtle
// ============================================================================

//! ## Overview
//! An access key is `hvo1/` followed by base64 of `<recordId>:<secret>`.
//! Only a SHA-256 digest of the secret is persisted; verification compares
//! digests in constant time.
//!
//! Digests are a single unsalted SHA-256 round, not a password hash; every
//! secret carries 160 bits of randomness.
//!
//! Security posture: the secret never appears in `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of every organization access key (Hive, organization, version 1).
pub const ACCESS_KEY_PREFIX: &str = "hvo1/";
/// Number of leading key characters stored for display.
pub const FIRST_CHARACTERS_LENGTH: usize = 10;
/// Random bytes drawn per generated secret.
const SECRET_ENTROPY_BYTES: usize = 20;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Access key decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessKeyError {
    /// The value does not start with [`ACCESS_KEY_PREFIX`].
    #[error("access key prefix missing")]
    MissingPrefix,
    /// The payload is not valid base64 or UTF-8.
    #[error("access key payload is not valid base64 text")]
    InvalidEncoding,
    /// The payload is not `<id>:<secret>`.
    #[error("access key payload is malformed")]
    InvalidFormat,
}

/// Record id and secret carried by an access key.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedAccessKey {
    /// Token record identifier.
    pub id: String,
    /// Secret compared against the stored digest.
    pub private_key: String,
}

impl fmt::Debug for DecodedAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedAccessKey")
            .field("id", &self.id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Output of [`create`]: the key shown once plus what gets persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct CreatedAccessKey {
    /// Full access key handed to the user.
    pub private_access_token: String,
    /// Hex SHA-256 digest of the secret.
    pub hash: String,
    /// Leading characters of the key for display.
    pub first_characters: String,
}

impl fmt::Debug for CreatedAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatedAccessKey")
            .field("private_access_token", &"<redacted>")
            .field("hash", &self.hash)
            .field("first_characters", &self.first_characters)
            .finish()
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes a record id and secret into an access key.
#[must_use]
pub fn encode(record_id: &str, secret: &str) -> String {
    format!("{ACCESS_KEY_PREFIX}{}", STANDARD.encode(format!("{record_id}:{secret}")))
}

/// Returns true when the value carries the access key prefix.
#[must_use]
pub fn has_access_key_prefix(value: &str) -> bool {
    value.starts_with(ACCESS_KEY_PREFIX)
}

/// Decodes an access key into its record id and secret.
///
/// # Errors
///
/// Returns [`AccessKeyError`] when the prefix, encoding, or layout is wrong.
pub fn decode(access_key: &str) -> Result<DecodedAccessKey, AccessKeyError> {
    let payload = access_key.strip_prefix(ACCESS_KEY_PREFIX).ok_or(AccessKeyError::MissingPrefix)?;
    let bytes = STANDARD.decode(payload).map_err(|_| AccessKeyError::InvalidEncoding)?;
    let text = String::from_utf8(bytes).map_err(|_| AccessKeyError::InvalidEncoding)?;
    let mut parts = text.split(':');
    let (Some(id), Some(private_key), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AccessKeyError::InvalidFormat);
    };
    if id.is_empty() || private_key.is_empty() {
        return Err(AccessKeyError::InvalidFormat);
    }
    Ok(DecodedAccessKey {
        id: id.to_string(),
        private_key: private_key.to_string(),
    })
}

// ============================================================================
// SECTION: Creation & Verification
// ============================================================================

/// Creates a new access key for a token record.
#[must_use]
pub fn create(record_id: &str) -> CreatedAccessKey {
    let mut entropy = [0_u8; SECRET_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut entropy);
    let secret = sha256_hex(&entropy);
    let hash = sha256_hex(secret.as_bytes());
    let private_access_token = encode(record_id, &secret);
    let first_characters = private_access_token.chars().take(FIRST_CHARACTERS_LENGTH).collect();
    CreatedAccessKey {
        private_access_token,
        hash,
        first_characters,
    }
}

/// Returns true when the secret matches the stored digest.
#[must_use]
pub fn verify(secret: &str, hash: &str) -> bool {
    sha256_hex(secret.as_bytes()).as_bytes().ct_eq(hash.as_bytes()).into()
}

/// Hex SHA-256 digest of arbitrary bytes.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push(HEX[usize::from(byte >> 4)] as char);
        out.push(HEX[usize::from(byte & 0x0f)] as char);
    }
    out
}
