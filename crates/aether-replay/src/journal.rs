//! The recorded trace format [`replay`](crate::replay) consumes.

use aether_canon::Digest;
use aether_evidence::Verdict;
use aether_types::{SchemaVersion, ValidityOutcome};
use serde::{Deserialize, Serialize};

/// One recorded call into [`aether_evidence::EvidenceEngine::process_observation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// The target patch id.
    pub patch_id: String,
    /// The frame id this observation was captured under.
    pub frame_id: String,
    /// Caller-supplied monotonic capture timestamp, milliseconds.
    pub timestamp_ms: i64,
    /// The validity outcome an external `ValidityModel` run assigned to
    /// this observation.
    pub outcome: ValidityOutcome,
    /// Whether this step crosses an epoch boundary, per the EEB's
    /// epoch-migration rule.
    pub is_cross_epoch: bool,
    /// The external quality gate's scalar quality assessment, `[0, 1]`.
    pub gate_quality: f64,
    /// The external quality gate's verdict.
    pub verdict: Verdict,
}

/// A request to verify the engine's snapshot after a given step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCheckpoint {
    /// Index into the journal's `steps`; the checkpoint is evaluated
    /// immediately after this step is applied.
    pub after_step_index: usize,
    /// Caller-supplied snapshot export timestamp.
    pub exported_at_ms: i64,
    /// Wire schema version the snapshot is exported under.
    pub schema_version: SchemaVersion,
    /// The exact canonical bytes recorded at capture time, if the
    /// journal carries them. When absent, replay checks only the
    /// digest.
    pub expected_canonical_bytes: Option<Vec<u8>>,
    /// The digest recorded at capture time.
    pub expected_digest: Digest,
}

/// A full recorded trace: an ordered list of engine inputs and the
/// checkpoints to verify against them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Journal {
    /// Steps applied to the engine, strictly in order.
    pub steps: Vec<ReplayStep>,
    /// Checkpoints to verify, ordered by `after_step_index`.
    pub checkpoints: Vec<SnapshotCheckpoint>,
}

impl Journal {
    /// Parses a journal from its canonical JSON encoding.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encodes a journal to JSON, for recording a fresh trace.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
