//! Canonical serialization of an [`EngineSnapshot`].

use aether_canon::{CanonError, CanonWriter};
use aether_kernel::Q16;
use aether_types::{EebLevel, LayoutVersion, PatchEntry, SchemaVersion};

/// An immutable, freely shareable export of one engine's state at a point
/// in time.
///
/// Only the fields named in the canonical layout participate in
/// [`EngineSnapshot::to_canonical_bytes`] — `gate_display`,
/// `soft_display`, and `last_total_display` are session-level displays
/// carried for inspection, not part of the digest preimage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineSnapshot {
    /// Patch entries, sorted by patch id for deterministic export.
    pub patches: Vec<(String, PatchEntry)>,
    /// Monotonic gate display, never retreats within a session.
    pub gate_display: f64,
    /// Monotonic soft display, never retreats within a session.
    pub soft_display: f64,
    /// The most recently observed (un-maxed) aggregated display value.
    pub last_total_display: f64,
    /// Caller-supplied export timestamp.
    pub exported_at_ms: i64,
    /// Wire schema version this snapshot was exported under.
    pub schema_version: SchemaVersion,
    /// Layout version of the canonical export format.
    pub layout_version: LayoutVersion,
}

fn write_len_prefixed_string(w: &mut CanonWriter, s: &str) -> Result<(), CanonError> {
    if s.len() > u8::MAX as usize {
        return Err(CanonError::ArrayTooLong { actual: s.len() });
    }
    w.u8(s.len() as u8);
    w.write_bytes(s.as_bytes());
    Ok(())
}

fn level_ordinal(level: EebLevel) -> u8 {
    match level {
        EebLevel::L0 => 0,
        EebLevel::L1 => 1,
        EebLevel::L2 => 2,
        EebLevel::L3Core => 3,
        EebLevel::L3Strict => 4,
    }
}

impl EngineSnapshot {
    /// Serializes this snapshot through [`CanonWriter`] in the fixed
    /// order: `layoutVersion, schemaVersion, exportedAtMs, patchCount,
    /// [patchEntry…]`, each entry `idLen, idBytes, evidenceQ16,
    /// lastUpdateMs, observationCount, errorCount, errorStreak,
    /// lastGoodUpdateMs, level, bestFrameId`.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, CanonError> {
        let mut w = CanonWriter::new();
        w.u8(self.layout_version);
        w.u16_be(self.schema_version);
        w.i64_be(self.exported_at_ms);
        w.array_prefix(self.patches.len())?;

        for (patch_id, entry) in &self.patches {
            write_len_prefixed_string(&mut w, patch_id)?;
            w.i64_be(Q16::from_f64(entry.evidence).raw());
            w.i64_be(entry.last_update_ms);
            w.u64_be(entry.observation_count);
            w.u64_be(entry.error_count);
            w.u32_be(entry.error_streak);
            w.i64_be(entry.last_good_update_ms);
            w.u8(level_ordinal(entry.level));
            match &entry.best_frame_id {
                Some(frame_id) => {
                    w.presence_present();
                    write_len_prefixed_string(&mut w, frame_id)?;
                }
                None => {
                    w.presence_absent();
                }
            }
        }

        Ok(w.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PatchEntry {
        let mut e = PatchEntry::new(0);
        e.evidence = 0.5;
        e.observation_count = 3;
        e.best_frame_id = Some("frame-7".to_string());
        e
    }

    #[test]
    fn export_starts_with_layout_and_schema_version() {
        let snapshot = EngineSnapshot {
            patches: vec![],
            gate_display: 0.0,
            soft_display: 0.0,
            last_total_display: 0.0,
            exported_at_ms: 42,
            schema_version: 0x0204,
            layout_version: 1,
        };
        let bytes = snapshot.to_canonical_bytes().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..3], &[0x02, 0x04]);
        assert_eq!(&bytes[11..12], &[0]);
    }

    #[test]
    fn export_is_deterministic_across_repeated_calls() {
        let snapshot = EngineSnapshot {
            patches: vec![("patch-a".to_string(), entry())],
            gate_display: 0.0,
            soft_display: 0.0,
            last_total_display: 0.0,
            exported_at_ms: 1000,
            schema_version: 1,
            layout_version: 1,
        };
        assert_eq!(snapshot.to_canonical_bytes().unwrap(), snapshot.to_canonical_bytes().unwrap());
    }

    #[test]
    fn export_encodes_absent_best_frame_id_as_zero_tag() {
        let mut e = PatchEntry::new(0);
        e.best_frame_id = None;
        let snapshot = EngineSnapshot {
            patches: vec![("patch-a".to_string(), e)],
            gate_display: 0.0,
            soft_display: 0.0,
            last_total_display: 0.0,
            exported_at_ms: 0,
            schema_version: 1,
            layout_version: 1,
        };
        let bytes = snapshot.to_canonical_bytes().unwrap();
        assert!(bytes.contains(&0x00));
    }
}
