//! Replays a recorded journal of `(inputs, expectedDigest)` records
//! through the evidence pipeline and asserts byte-exact re-derivation of
//! both the canonical export bytes and the 32-byte digest.
//!
//! Replay never consults the clock, the network, or randomness — every
//! timestamp and identifier it touches is carried in the journal itself.
//! On the first diverging checkpoint, replay stops and reports exactly
//! which checkpoint failed and how.

#![forbid(unsafe_code)]

mod journal;

pub use journal::{Journal, ReplayStep, SnapshotCheckpoint};

use aether_canon::{compute_digest, digest_hex, CanonError, Digest};
use aether_evidence::{EvidenceEngine, EvidenceThresholds};
use thiserror::Error;

/// The first point at which a replay diverged from its journal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayDivergence {
    /// The re-derived canonical bytes did not match the journal's
    /// recorded bytes at this checkpoint.
    #[error("checkpoint {checkpoint_index} diverged: canonical bytes do not match the recorded trace")]
    CanonicalBytesMismatch {
        /// Index into `Journal::checkpoints`.
        checkpoint_index: usize,
    },
    /// The re-derived digest did not match the journal's expected digest
    /// at this checkpoint.
    #[error("checkpoint {checkpoint_index} diverged: digest {actual:x?} does not match expected {expected:x?}")]
    DigestMismatch {
        /// Index into `Journal::checkpoints`.
        checkpoint_index: usize,
        /// The digest this replay actually produced.
        actual: Digest,
        /// The digest the journal recorded.
        expected: Digest,
    },
    /// The engine's own snapshot could not be serialized. A well-formed
    /// journal never triggers this; it surfaces a malformed journal
    /// (e.g. a patch id or frame id over 255 bytes) rather than masking
    /// it as a digest mismatch.
    #[error(transparent)]
    Export(#[from] CanonError),
}

impl ReplayDivergence {
    /// A short, grep-able summary naming the checkpoint and a hex digest
    /// where relevant — useful when surfacing the first diverging record
    /// to a human operator.
    pub fn describe(&self) -> String {
        match self {
            ReplayDivergence::CanonicalBytesMismatch { checkpoint_index } => {
                format!("checkpoint {checkpoint_index}: canonical bytes mismatch")
            }
            ReplayDivergence::DigestMismatch { checkpoint_index, actual, expected } => {
                format!(
                    "checkpoint {checkpoint_index}: digest mismatch, got {} expected {}",
                    digest_hex(actual),
                    digest_hex(expected)
                )
            }
            ReplayDivergence::Export(err) => format!("journal export failed: {err}"),
        }
    }
}

/// Re-executes `journal` against a fresh [`EvidenceEngine`] and verifies
/// every checkpoint's recorded canonical bytes and digest.
///
/// Steps are applied to the engine strictly in journal order, matching
/// the ordering guarantee in §5: the digest of the Nth checkpoint depends
/// only on the accepted steps up to that point, in that order. The first
/// diverging checkpoint short-circuits the replay and is returned; all
/// earlier checkpoints are guaranteed to have matched.
pub fn replay(journal: &Journal, thresholds: EvidenceThresholds) -> Result<(), ReplayDivergence> {
    let mut engine = EvidenceEngine::new(thresholds);
    let mut next_checkpoint = 0;

    for (step_index, step) in journal.steps.iter().enumerate() {
        engine.process_observation(
            &step.patch_id,
            &step.frame_id,
            step.timestamp_ms,
            step.outcome,
            step.is_cross_epoch,
            step.gate_quality,
            step.verdict,
        );

        while next_checkpoint < journal.checkpoints.len()
            && journal.checkpoints[next_checkpoint].after_step_index == step_index
        {
            let checkpoint = &journal.checkpoints[next_checkpoint];
            let snapshot = engine.snapshot(checkpoint.exported_at_ms, checkpoint.schema_version);
            let bytes = snapshot.to_canonical_bytes()?;

            if let Some(expected_bytes) = &checkpoint.expected_canonical_bytes {
                if &bytes != expected_bytes {
                    return Err(ReplayDivergence::CanonicalBytesMismatch { checkpoint_index: next_checkpoint });
                }
            }

            let actual_digest = compute_digest(&bytes);
            if actual_digest != checkpoint.expected_digest {
                return Err(ReplayDivergence::DigestMismatch {
                    checkpoint_index: next_checkpoint,
                    actual: actual_digest,
                    expected: checkpoint.expected_digest,
                });
            }

            next_checkpoint += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_types::ValidityOutcome;

    fn single_step_journal(gate_quality: f64, schema_version: u16) -> (Journal, Digest) {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, gate_quality, aether_evidence::Verdict::Good);
        let snapshot = engine.snapshot(1000, schema_version);
        let bytes = snapshot.to_canonical_bytes().unwrap();
        let digest = compute_digest(&bytes);

        let journal = Journal {
            steps: vec![ReplayStep {
                patch_id: "patch-1".to_string(),
                frame_id: "frame-1".to_string(),
                timestamp_ms: 0,
                outcome: ValidityOutcome::L1,
                is_cross_epoch: false,
                gate_quality,
                verdict: aether_evidence::Verdict::Good,
            }],
            checkpoints: vec![SnapshotCheckpoint {
                after_step_index: 0,
                exported_at_ms: 1000,
                schema_version,
                expected_canonical_bytes: Some(bytes),
                expected_digest: digest,
            }],
        };
        (journal, digest)
    }

    #[test]
    fn matching_journal_replays_cleanly() {
        let (journal, _digest) = single_step_journal(0.5, 1);
        assert!(replay(&journal, EvidenceThresholds::default()).is_ok());
    }

    #[test]
    fn tampered_expected_digest_is_caught() {
        let (mut journal, _digest) = single_step_journal(0.5, 1);
        journal.checkpoints[0].expected_digest[0] ^= 0xFF;
        let err = replay(&journal, EvidenceThresholds::default()).unwrap_err();
        assert!(matches!(err, ReplayDivergence::DigestMismatch { checkpoint_index: 0, .. }));
    }

    #[test]
    fn tampered_expected_bytes_is_caught_before_digest_check() {
        let (mut journal, _digest) = single_step_journal(0.5, 1);
        if let Some(bytes) = journal.checkpoints[0].expected_canonical_bytes.as_mut() {
            bytes.push(0x00);
        }
        let err = replay(&journal, EvidenceThresholds::default()).unwrap_err();
        assert!(matches!(err, ReplayDivergence::CanonicalBytesMismatch { checkpoint_index: 0 }));
    }

    #[test]
    fn multi_step_journal_checkpoints_only_the_requested_steps() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.3, aether_evidence::Verdict::Good);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L1, false, 0.6, aether_evidence::Verdict::Good);
        let snapshot = engine.snapshot(2000, 1);
        let bytes = snapshot.to_canonical_bytes().unwrap();
        let digest = compute_digest(&bytes);

        let journal = Journal {
            steps: vec![
                ReplayStep {
                    patch_id: "patch-1".to_string(),
                    frame_id: "frame-1".to_string(),
                    timestamp_ms: 0,
                    outcome: ValidityOutcome::L1,
                    is_cross_epoch: false,
                    gate_quality: 0.3,
                    verdict: aether_evidence::Verdict::Good,
                },
                ReplayStep {
                    patch_id: "patch-1".to_string(),
                    frame_id: "frame-2".to_string(),
                    timestamp_ms: 1,
                    outcome: ValidityOutcome::L1,
                    is_cross_epoch: false,
                    gate_quality: 0.6,
                    verdict: aether_evidence::Verdict::Good,
                },
            ],
            checkpoints: vec![SnapshotCheckpoint {
                after_step_index: 1,
                exported_at_ms: 2000,
                schema_version: 1,
                expected_canonical_bytes: Some(bytes),
                expected_digest: digest,
            }],
        };

        assert!(replay(&journal, EvidenceThresholds::default()).is_ok());
    }
}
