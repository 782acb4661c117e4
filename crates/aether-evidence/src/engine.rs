//! The per-session evidence accumulator.

use std::collections::HashMap;

use aether_kernel::scalar::clamp01;
use aether_types::{EebLevel, PatchEntry, SchemaVersion, ValidityOutcome, CURRENT_LAYOUT_VERSION};
use aether_validity::{allows, Trigger};

use crate::constants::EvidenceThresholds;
use crate::export::EngineSnapshot;
use crate::visual_state::{classify, VisualState};

/// The outcome an external quality gate assigned to one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verdict {
    /// Accepted: contributes to accumulated evidence.
    Good,
    /// Counted but does not raise evidence; extends the error streak.
    Suspect,
    /// Discarded from accumulation, but still counted.
    Reject,
}

fn level_and_trigger(outcome: ValidityOutcome) -> Option<(EebLevel, Trigger)> {
    match outcome {
        ValidityOutcome::Invalid(_) => None,
        ValidityOutcome::L1 => Some((EebLevel::L1, Trigger::NewValidObservation)),
        ValidityOutcome::L2 => Some((EebLevel::L2, Trigger::NewBaselineSatisfied)),
        ValidityOutcome::L3Core => Some((EebLevel::L3Core, Trigger::NewColorStabilitySatisfied)),
        ValidityOutcome::L3Strict => Some((EebLevel::L3Strict, Trigger::NewColorStabilitySatisfied)),
    }
}

/// The single logical owner of one session's per-patch and display
/// state.
///
/// Every mutating method takes `&mut self` — in Rust this *is* the
/// single-owner guarantee the model calls for: the borrow checker refuses
/// to compile a second concurrent mutable access, with no runtime lock
/// required. A caller that genuinely needs to share one engine across
/// threads wraps it in `Arc<Mutex<EvidenceEngine>>` at the call site.
#[derive(Debug, Clone)]
pub struct EvidenceEngine {
    patches: HashMap<String, PatchEntry>,
    gate_display: f64,
    soft_display: f64,
    last_total_display: f64,
    visual_state: VisualState,
    thresholds: EvidenceThresholds,
}

impl EvidenceEngine {
    /// Builds an empty engine using `thresholds` for session display
    /// classification.
    pub fn new(thresholds: EvidenceThresholds) -> Self {
        Self {
            patches: HashMap::new(),
            gate_display: 0.0,
            soft_display: 0.0,
            last_total_display: 0.0,
            visual_state: VisualState::Black,
            thresholds,
        }
    }

    /// Read-only access to one patch's accumulated state, if it exists.
    pub fn patch(&self, patch_id: &str) -> Option<&PatchEntry> {
        self.patches.get(patch_id)
    }

    /// The current session visual state.
    pub fn visual_state(&self) -> VisualState {
        self.visual_state
    }

    /// Applies one observation's outcome to its patch's accumulated
    /// state, per the engine's update rules:
    ///
    /// 1. Compute the EEB level via `outcome` and [`allows`]; downgrades
    ///    are structurally impossible because `allows` never permits one.
    /// 2. `observation_count += 1`.
    /// 3. `good`: `evidence := max(evidence, gate_quality)`, update
    ///    `best_frame_id` iff `gate_quality` strictly exceeds the
    ///    previous evidence, reset the error streak.
    /// 4. `suspect`: bump error count and streak; evidence unchanged.
    /// 5. `reject`: discarded from accumulation, still counted.
    /// 6. `last_update_ms := timestamp_ms`.
    pub fn process_observation(
        &mut self,
        patch_id: &str,
        frame_id: &str,
        timestamp_ms: i64,
        outcome: ValidityOutcome,
        is_cross_epoch: bool,
        gate_quality: f64,
        verdict: Verdict,
    ) {
        let entry = self
            .patches
            .entry(patch_id.to_string())
            .or_insert_with(|| PatchEntry::new(timestamp_ms));

        if let Some((candidate_level, trigger)) = level_and_trigger(outcome) {
            if allows(entry.level, candidate_level, trigger, is_cross_epoch) {
                entry.level = candidate_level;
            }
        }

        entry.observation_count += 1;

        match verdict {
            Verdict::Good => {
                let gate = clamp01(gate_quality);
                if gate > entry.evidence {
                    entry.best_frame_id = Some(frame_id.to_string());
                }
                entry.evidence = entry.evidence.max(gate);
                entry.last_good_update_ms = timestamp_ms;
                entry.error_streak = 0;
            }
            Verdict::Suspect => {
                entry.error_count += 1;
                entry.error_streak += 1;
            }
            Verdict::Reject => {}
        }

        entry.last_update_ms = timestamp_ms;

        #[cfg(feature = "telemetry")]
        tracing::debug!(patch_id, ?verdict, observation_count = entry.observation_count, "evidence_update");
    }

    /// Updates the session-level monotonic displays and visual state.
    /// `aggregated_gate`/`aggregated_soft`/`coverage` are externally
    /// computed scalars in `[0, 1]`.
    pub fn update_displays(&mut self, aggregated_gate: f64, aggregated_soft: f64, coverage: f64) {
        self.last_total_display = aggregated_gate;
        self.gate_display = self.gate_display.max(clamp01(aggregated_gate));
        self.soft_display = self.soft_display.max(clamp01(aggregated_soft));
        let candidate = classify(clamp01(coverage), self.soft_display, &self.thresholds);
        self.visual_state = self.visual_state.max(candidate);
    }

    /// Produces an immutable, sorted-by-patch-id snapshot of the current
    /// state. `exported_at_ms` is caller-supplied.
    pub fn snapshot(&self, exported_at_ms: i64, schema_version: SchemaVersion) -> EngineSnapshot {
        let mut patches: Vec<(String, PatchEntry)> =
            self.patches.iter().map(|(id, entry)| (id.clone(), entry.clone())).collect();
        patches.sort_by(|a, b| a.0.cmp(&b.0));

        EngineSnapshot {
            patches,
            gate_display: self.gate_display,
            soft_display: self.soft_display,
            last_total_display: self.last_total_display,
            exported_at_ms,
            schema_version,
            layout_version: CURRENT_LAYOUT_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_verdict_raises_evidence_monotonically() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.3, Verdict::Good);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L1, false, 0.2, Verdict::Good);
        let patch = engine.patch("patch-1").unwrap();
        assert_eq!(patch.evidence, 0.3);
        assert_eq!(patch.best_frame_id.as_deref(), Some("frame-1"));
    }

    #[test]
    fn higher_gate_quality_replaces_best_frame() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.3, Verdict::Good);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L1, false, 0.6, Verdict::Good);
        let patch = engine.patch("patch-1").unwrap();
        assert_eq!(patch.evidence, 0.6);
        assert_eq!(patch.best_frame_id.as_deref(), Some("frame-2"));
    }

    #[test]
    fn suspect_verdict_increments_error_streak_without_touching_evidence() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.5, Verdict::Good);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L1, false, 0.0, Verdict::Suspect);
        let patch = engine.patch("patch-1").unwrap();
        assert_eq!(patch.evidence, 0.5);
        assert_eq!(patch.error_streak, 1);
        assert_eq!(patch.error_count, 1);
    }

    #[test]
    fn good_verdict_resets_error_streak() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.5, Verdict::Suspect);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L1, false, 0.5, Verdict::Good);
        assert_eq!(engine.patch("patch-1").unwrap().error_streak, 0);
    }

    #[test]
    fn eeb_level_never_downgrades_even_on_a_lower_outcome() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.5, Verdict::Good);
        assert_eq!(engine.patch("patch-1").unwrap().level, EebLevel::L1);
        engine.process_observation(
            "patch-1",
            "frame-2",
            1,
            ValidityOutcome::Invalid(aether_types::InvalidReason::FullyOccluded),
            false,
            0.5,
            Verdict::Suspect,
        );
        assert_eq!(engine.patch("patch-1").unwrap().level, EebLevel::L1);
    }

    #[test]
    fn eeb_level_cannot_skip_from_l1_to_l3() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.5, Verdict::Good);
        engine.process_observation("patch-1", "frame-2", 1, ValidityOutcome::L3Strict, false, 0.5, Verdict::Good);
        assert_eq!(engine.patch("patch-1").unwrap().level, EebLevel::L1);
    }

    #[test]
    fn reject_verdict_is_counted_but_does_not_touch_evidence() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("patch-1", "frame-1", 0, ValidityOutcome::L1, false, 0.7, Verdict::Reject);
        let patch = engine.patch("patch-1").unwrap();
        assert_eq!(patch.observation_count, 1);
        assert_eq!(patch.evidence, 0.0);
    }

    #[test]
    fn displays_never_retreat() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.update_displays(0.8, 0.8, 0.8);
        engine.update_displays(0.2, 0.2, 0.2);
        assert!((engine.gate_display - 0.8).abs() < 1e-12);
        assert!((engine.soft_display - 0.8).abs() < 1e-12);
        assert!(engine.visual_state() >= VisualState::LightGray);
    }

    #[test]
    fn visual_state_reaches_original_only_with_both_thresholds() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.update_displays(0.9, 0.95, 0.95);
        assert_eq!(engine.visual_state(), VisualState::Original);
    }

    #[test]
    fn snapshot_is_sorted_by_patch_id() {
        let mut engine = EvidenceEngine::new(EvidenceThresholds::default());
        engine.process_observation("zeta", "f", 0, ValidityOutcome::L1, false, 0.1, Verdict::Good);
        engine.process_observation("alpha", "f", 0, ValidityOutcome::L1, false, 0.1, Verdict::Good);
        let snapshot = engine.snapshot(0, 1);
        let ids: Vec<&str> = snapshot.patches.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }
}
