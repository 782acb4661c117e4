//! Append-only binary Merkle hash tree with RFC-9162-style domain
//! separation between leaf and internal-node hashing.

#![forbid(unsafe_code)]

mod proof;
mod tree;

pub use proof::InclusionProof;
pub use tree::{ConsistencyProofError, MerkleError, MerkleLog};

use sha2::{Digest as _, Sha256};

/// A 32-byte node hash.
pub type Digest = [u8; 32];

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// `H(0x00 ‖ data)`.
pub fn leaf_hash(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

/// `H(0x01 ‖ left ‖ right)`.
pub fn node_hash(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_and_node_prefixes_are_domain_separated() {
        let left = [7u8; 32];
        let right = [9u8; 32];
        let leaf = leaf_hash(&left);
        let node = node_hash(&left, &right);
        assert_ne!(leaf, node);
    }
}
