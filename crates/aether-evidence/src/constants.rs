//! Frozen thresholds consumed by the session-level display logic.

/// Coverage/quality thresholds the evidence engine maps onto a
/// [`crate::VisualState`]. Caller-supplied, per the "constants live
/// outside the model" pattern shared with `aether-validity`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvidenceThresholds {
    /// Coverage at or above which the display may leave `Black`.
    pub dark_gray_coverage: f64,
    /// Coverage at or above which the display may reach `LightGray`.
    pub light_gray_coverage: f64,
    /// Coverage at or above which the display may reach `White`.
    pub white_coverage: f64,
    /// `softDisplay` must exceed this, simultaneously with
    /// `white_coverage`, for the display to reach `Original`.
    pub original_soft_display: f64,
}

impl Default for EvidenceThresholds {
    fn default() -> Self {
        Self {
            dark_gray_coverage: 0.10,
            light_gray_coverage: 0.40,
            white_coverage: 0.75,
            original_soft_display: 0.90,
        }
    }
}
