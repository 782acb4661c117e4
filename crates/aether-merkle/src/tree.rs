//! The append-only tree itself.

use crate::proof::InclusionProof;
use crate::{leaf_hash, node_hash, Digest};

/// Fatal precondition violations raised by [`MerkleLog`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    /// `append_hash` received a slice that was not exactly 32 bytes.
    #[error("hash must be exactly 32 bytes, got {actual}")]
    WrongHashLength {
        /// The actual slice length.
        actual: usize,
    },
    /// `generate_inclusion_proof` was asked for a leaf index at or beyond
    /// the current tree size.
    #[error("leaf index {index} is out of range for a tree of size {size}")]
    InvalidLeafIndex {
        /// The requested index.
        index: usize,
        /// The current tree size.
        size: usize,
    },
}

/// Consistency proofs require retaining historical tree states, which is
/// out of scope for this implementation. Every call deterministically
/// returns this error rather than a partial or approximate proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("consistency proofs are not implemented")]
pub struct ConsistencyProofError;

/// An append-only binary Merkle hash tree.
///
/// Mutating operations (`append`, `append_hash`) require exclusive access
/// to the log — callers are expected to serialize writers externally (see
/// the engine's single-owner concurrency model). Read accessors
/// (`root_hash`, `size`) are safe to call freely once no writer is active.
#[derive(Debug, Default, Clone)]
pub struct MerkleLog {
    leaves: Vec<Digest>,
}

/// The 32-byte all-zero root of an empty tree.
pub const EMPTY_ROOT: Digest = [0u8; 32];

impl MerkleLog {
    /// Builds an empty log.
    pub fn new() -> Self {
        Self { leaves: Vec::new() }
    }

    /// The number of leaves appended so far.
    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    /// Hashes `data` as a leaf and appends it, returning the new root.
    pub fn append(&mut self, data: &[u8]) -> Digest {
        let hash = leaf_hash(data);
        self.leaves.push(hash);
        #[cfg(feature = "telemetry")]
        tracing::debug!(leaf_index = self.leaves.len() - 1, size = self.leaves.len(), "merkle_append");
        self.root_hash()
    }

    /// Appends a precomputed 32-byte leaf hash directly, without rehashing
    /// it. Any other length is a fatal precondition violation.
    pub fn append_hash(&mut self, hash: &[u8]) -> Result<Digest, MerkleError> {
        if hash.len() != 32 {
            return Err(MerkleError::WrongHashLength { actual: hash.len() });
        }
        let mut fixed = [0u8; 32];
        fixed.copy_from_slice(hash);
        self.leaves.push(fixed);
        Ok(self.root_hash())
    }

    /// The current root hash. The empty tree's root is [`EMPTY_ROOT`].
    pub fn root_hash(&self) -> Digest {
        if self.leaves.is_empty() {
            return EMPTY_ROOT;
        }
        let mut level = self.leaves.clone();
        while level.len() > 1 {
            level = fold_level(&level);
        }
        level[0]
    }

    /// Builds an inclusion proof for the leaf at `leaf_index`.
    pub fn generate_inclusion_proof(&self, leaf_index: usize) -> Result<InclusionProof, MerkleError> {
        if leaf_index >= self.leaves.len() {
            return Err(MerkleError::InvalidLeafIndex {
                index: leaf_index,
                size: self.leaves.len(),
            });
        }

        let mut level = self.leaves.clone();
        let mut index = leaf_index;
        let mut path = Vec::new();

        while level.len() > 1 {
            let is_odd_tail = level.len() % 2 == 1 && index == level.len() - 1;
            if !is_odd_tail {
                let sibling = if index % 2 == 0 { level[index + 1] } else { level[index - 1] };
                path.push(sibling);
            }
            level = fold_level(&level);
            index /= 2;
        }

        Ok(InclusionProof::new(leaf_index, self.leaves.len(), path))
    }

    /// Reserved: consistency proofs require historical tree-state
    /// retention, which this implementation does not keep. Always
    /// returns [`ConsistencyProofError`].
    pub fn generate_consistency_proof(&self, _s1: usize, _s2: usize) -> Result<(), ConsistencyProofError> {
        Err(ConsistencyProofError)
    }
}

/// Combines one level of the tree into the next: adjacent pairs are
/// combined with [`node_hash`]; an unpaired tail element is promoted
/// unchanged (no self-pairing).
fn fold_level(level: &[Digest]) -> Vec<Digest> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    let mut i = 0;
    while i < level.len() {
        if i + 1 < level.len() {
            next.push(node_hash(&level[i], &level[i + 1]));
        } else {
            next.push(level[i]);
        }
        i += 2;
    }
    next
}
