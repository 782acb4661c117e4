//! Canonical byte serialization and content digest.
//!
//! [`CanonWriter`] builds the fixed big-endian preimage bytes every
//! exportable record in the engine feeds to [`digest`]. The two are
//! deliberately split: `CanonWriter` knows nothing about hashing, and
//! `digest` knows nothing about field layout — anyone assembling a
//! canonical record composes them.

#![forbid(unsafe_code)]

mod uuid;
mod writer;

pub use uuid::{parse_uuid, UuidError};
pub use writer::{CanonError, CanonWriter};

use sha2::{Digest as _, Sha256};

/// A 32-byte content digest.
pub type Digest = [u8; 32];

/// The locked domain separator prefixed to every digest input.
///
/// `ASCII("AETHER3D_DECISION_HASH_V1") ‖ 0x00`, 26 bytes. Any change to
/// this constant is a deliberate digest break, not a bug.
pub const DOMAIN_TAG: &[u8; 26] = b"AETHER3D_DECISION_HASH_V1\0";

/// Computes `SHA-256(DOMAIN_TAG ‖ input_bytes)`.
pub fn compute_digest(input_bytes: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_TAG);
    hasher.update(input_bytes);
    hasher.finalize().into()
}

/// Renders a 32-byte digest as lowercase hex, for audit log and fixture
/// tooling.
///
/// `Digest` stays a plain `[u8; 32]` rather than a newtype wrapper — it is
/// written directly into canonical byte streams throughout this
/// workspace, and a wrapper would fight that usage at every call site.
/// This function is the `Display`-equivalent the plain alias can't carry
/// itself.
pub fn digest_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// Renders `DOMAIN_TAG ‖ input_bytes` as lowercase hex, for cross-platform
/// preimage fixtures.
pub fn preimage_hex(input_bytes: &[u8]) -> String {
    let mut preimage = Vec::with_capacity(DOMAIN_TAG.len() + input_bytes.len());
    preimage.extend_from_slice(DOMAIN_TAG);
    preimage.extend_from_slice(input_bytes);
    hex::encode(preimage)
}

/// The length in bytes of `DOMAIN_TAG ‖ input_bytes`.
pub fn preimage_length(input_bytes: &[u8]) -> usize {
    DOMAIN_TAG.len() + input_bytes.len()
}
