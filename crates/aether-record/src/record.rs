//! The canonical, fixed-layout `DecisionRecord` — the external interface
//! every downstream consumer (analytics, publish gating, audit tooling)
//! decodes against. Field order and widths are locked; see the module
//! doc for the positional table.

use aether_canon::{compute_digest, CanonError, CanonWriter, Digest};
use aether_types::{LayoutVersion, SchemaVersion, STRICT_SCHEMA_VERSION_MIN};
use thiserror::Error;

use crate::enums::{BuildMode, Classification, GuidanceSignal, UnknownEnumValue};

/// Throttle statistics, present only when the build pipeline throttled
/// this candidate's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThrottleStats {
    /// Length of the throttling window, milliseconds.
    pub window_ms: u64,
    /// Flows accepted within the window.
    pub accepted_count: u32,
    /// Flows throttled (rejected for rate) within the window.
    pub throttled_count: u32,
}

/// A single canonical decision record, matching the fixed positional
/// layout: `layoutVersion(1B)@0, schemaVersion(2B)@1, policyHash(8B)@3,
/// sessionStableId(8B)@11, candidateStableId(8B)@19,
/// classification(1B)@27, eebDelta(8B)@28, buildMode(1B)@36,
/// guidanceSignal(1B)@37, hardFuseTrigger(1-2B), degradationLevel(1B),
/// degradationReasonCode(1-2B), valueScore(8B), flowBucketCount(1B),
/// perFlowCounters(2*n B), throttleStats(1 or 17B), decisionHash(32B)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    /// Canonical layout version this record was built under.
    pub layout_version: LayoutVersion,
    /// Wire schema version. Values `>= STRICT_SCHEMA_VERSION_MIN` enable
    /// strict length validation and mandatory decision-hash computation.
    pub schema_version: SchemaVersion,
    /// Opaque 8-byte policy identifier the decision was evaluated under.
    pub policy_hash: u64,
    /// Opaque 8-byte stable identifier for the capture session.
    pub session_stable_id: u64,
    /// Opaque 8-byte stable identifier for the candidate within the
    /// session.
    pub candidate_stable_id: u64,
    /// Final classification.
    pub classification: Classification,
    /// Signed Q16.16 raw delta applied to the EEB level this decision
    /// represents, carried as the raw fixed-point bit pattern.
    pub eeb_delta: i64,
    /// Build mode this record was produced under.
    pub build_mode: BuildMode,
    /// Guidance hint surfaced to the operator.
    pub guidance_signal: GuidanceSignal,
    /// Set when a hard fuse tripped during evaluation; the payload is an
    /// opaque fuse identifier assigned by the triggering subsystem.
    pub hard_fuse_trigger: Option<u8>,
    /// Degradation level applied to this decision, `0` meaning none.
    pub degradation_level: u8,
    /// Reason code for a non-zero degradation level. Required (fail
    /// closed) whenever `degradation_level != 0` under a strict schema
    /// version.
    pub degradation_reason_code: Option<u8>,
    /// Signed value score assigned to this candidate.
    pub value_score: i64,
    /// Per-flow-bucket counters. Length must equal `flow_bucket_count`.
    pub per_flow_counters: Vec<u16>,
    /// Throttling statistics, if this candidate's flow was throttled.
    pub throttle_stats: Option<ThrottleStats>,
}

/// Errors raised while validating or serializing a [`DecisionRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A non-zero degradation level lacked a reason code under a strict
    /// schema version. Fail closed per §6: this is never relaxed away.
    #[error("degradation level {level} requires a reason code under schema {schema_version:#06x}")]
    MissingDegradationReasonCode {
        /// The non-zero degradation level.
        level: u8,
        /// The schema version that made the reason code mandatory.
        schema_version: SchemaVersion,
    },
    /// `flow_bucket_count` exceeded the single-byte count prefix.
    #[error(transparent)]
    Canon(#[from] CanonError),
    /// A closed enumeration held an unrecognized raw value.
    #[error(transparent)]
    UnknownEnum(#[from] UnknownEnumValue),
}

impl DecisionRecord {
    /// Flow bucket count, derived from `per_flow_counters.len()` rather
    /// than stored separately, so the two can never silently diverge.
    pub fn flow_bucket_count(&self) -> usize {
        self.per_flow_counters.len()
    }

    fn validate(&self) -> Result<(), RecordError> {
        if self.per_flow_counters.len() > u8::MAX as usize {
            return Err(CanonError::ArrayTooLong {
                actual: self.per_flow_counters.len(),
            }
            .into());
        }
        if self.degradation_level != 0
            && self.degradation_reason_code.is_none()
            && self.schema_version >= STRICT_SCHEMA_VERSION_MIN
        {
            return Err(RecordError::MissingDegradationReasonCode {
                level: self.degradation_level,
                schema_version: self.schema_version,
            });
        }
        Ok(())
    }

    fn write_preimage(&self) -> Result<CanonWriter, RecordError> {
        self.validate()?;
        let mut w = CanonWriter::new();
        w.u8(self.layout_version);
        w.u16_be(self.schema_version);
        w.u64_be(self.policy_hash);
        w.u64_be(self.session_stable_id);
        w.u64_be(self.candidate_stable_id);
        w.u8(self.classification.to_u8());
        w.i64_be(self.eeb_delta);
        w.u8(self.build_mode.to_u8());
        w.u8(self.guidance_signal.to_u8());
        w.optional(self.hard_fuse_trigger, |w, v| {
            w.u8(v);
        });
        w.u8(self.degradation_level);
        w.optional(self.degradation_reason_code, |w, v| {
            w.u8(v);
        });
        w.i64_be(self.value_score);
        w.array_prefix(self.per_flow_counters.len())?;
        for &counter in &self.per_flow_counters {
            w.u16_be(counter);
        }
        w.optional(self.throttle_stats, |w, stats| {
            w.u64_be(stats.window_ms);
            w.u32_be(stats.accepted_count);
            w.u32_be(stats.throttled_count);
        });
        Ok(w)
    }

    /// Computes `compute_digest` over every field preceding `decisionHash`
    /// in the canonical layout.
    pub fn compute_decision_hash(&self) -> Result<Digest, RecordError> {
        let w = self.write_preimage()?;
        Ok(compute_digest(w.as_bytes()))
    }

    /// Serializes this record through [`CanonWriter`] in full, including
    /// the trailing `decisionHash`.
    ///
    /// For `schema_version >= STRICT_SCHEMA_VERSION_MIN` the hash is
    /// always freshly computed over the preceding bytes, per §6's
    /// "mandatory decision-hash computation" rule. Below that threshold
    /// a caller-supplied `decision_hash_override` is honored verbatim
    /// (legacy records may carry a hash computed elsewhere, or none at
    /// all, represented here as 32 zero bytes).
    pub fn to_canonical_bytes(&self, decision_hash_override: Option<Digest>) -> Result<Vec<u8>, RecordError> {
        let mut w = self.write_preimage()?;
        let hash = if self.schema_version >= STRICT_SCHEMA_VERSION_MIN {
            compute_digest(w.as_bytes())
        } else {
            decision_hash_override.unwrap_or([0u8; 32])
        };
        w.write_fixed_bytes(&hash, 32)?;
        Ok(w.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> DecisionRecord {
        DecisionRecord {
            layout_version: 1,
            schema_version: 1,
            policy_hash: 0xAAAA_BBBB_CCCC_DDDD,
            session_stable_id: 1,
            candidate_stable_id: 2,
            classification: Classification::Accepted,
            eeb_delta: 0,
            build_mode: BuildMode::Full,
            guidance_signal: GuidanceSignal::None,
            hard_fuse_trigger: None,
            degradation_level: 0,
            degradation_reason_code: None,
            value_score: 42,
            per_flow_counters: vec![1, 2, 3],
            throttle_stats: None,
        }
    }

    #[test]
    fn flow_bucket_count_reflects_counters_len() {
        let record = base_record();
        assert_eq!(record.flow_bucket_count(), 3);
    }

    #[test]
    fn strict_schema_requires_degradation_reason_code() {
        let mut record = base_record();
        record.schema_version = STRICT_SCHEMA_VERSION_MIN;
        record.degradation_level = 2;
        record.degradation_reason_code = None;
        let err = record.to_canonical_bytes(None).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingDegradationReasonCode {
                level: 2,
                schema_version: STRICT_SCHEMA_VERSION_MIN,
            }
        );
    }

    #[test]
    fn legacy_schema_permits_missing_degradation_reason_code() {
        let mut record = base_record();
        record.schema_version = STRICT_SCHEMA_VERSION_MIN - 1;
        record.degradation_level = 2;
        record.degradation_reason_code = None;
        assert!(record.to_canonical_bytes(None).is_ok());
    }

    #[test]
    fn strict_schema_always_computes_a_fresh_decision_hash() {
        let mut record = base_record();
        record.schema_version = STRICT_SCHEMA_VERSION_MIN;
        let bytes = record.to_canonical_bytes(Some([0xFF; 32])).unwrap();
        let hash = &bytes[bytes.len() - 32..];
        assert_ne!(hash, &[0xFFu8; 32][..]);
        assert_eq!(hash, record.compute_decision_hash().unwrap());
    }

    #[test]
    fn legacy_schema_honors_override_hash() {
        let record = base_record();
        let bytes = record.to_canonical_bytes(Some([0xAB; 32])).unwrap();
        let hash = &bytes[bytes.len() - 32..];
        assert_eq!(hash, &[0xABu8; 32][..]);
    }

    #[test]
    fn legacy_schema_defaults_to_zero_hash_without_override() {
        let record = base_record();
        let bytes = record.to_canonical_bytes(None).unwrap();
        let hash = &bytes[bytes.len() - 32..];
        assert_eq!(hash, &[0u8; 32][..]);
    }

    #[test]
    fn serialization_is_deterministic() {
        let record = base_record();
        assert_eq!(record.to_canonical_bytes(None).unwrap(), record.to_canonical_bytes(None).unwrap());
    }

    #[test]
    fn throttle_stats_round_trip_through_the_preimage() {
        let mut record = base_record();
        record.throttle_stats = Some(ThrottleStats {
            window_ms: 1000,
            accepted_count: 9,
            throttled_count: 1,
        });
        let bytes = record.to_canonical_bytes(None).unwrap();
        assert!(bytes.len() > 32);
    }

    #[test]
    fn flow_bucket_prefix_matches_declared_count() {
        let record = base_record();
        let bytes = record.write_preimage().unwrap().into_bytes();
        let count_offset = 1 + 2 + 8 + 8 + 8 + 1 + 8 + 1 + 1 + 1 + 1 + 1 + 8;
        assert_eq!(bytes[count_offset], record.per_flow_counters.len() as u8);
    }
}
