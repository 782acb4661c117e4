//! The frozen constants table the validity model consults. The model
//! itself never embeds a threshold.

/// All epsilon and threshold constants consumed by [`crate::l1`],
/// [`crate::l2`], [`crate::l3`], and [`crate::distinct_viewpoints`].
///
/// Constructed by the caller (typically from deployment configuration);
/// the validity model never hardcodes a threshold of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidityConstants {
    /// Minimum projected overlap area for L1 acceptance.
    pub epsilon_area: f64,
    /// Maximum reprojection error in pixels for an L2 pair to be valid.
    pub epsilon_rep: f64,
    /// Maximum triangulated variance for an L2 pair to be valid.
    pub epsilon_geom: f64,
    /// Maximum depth-sample variance for L3.
    pub epsilon_depth: f64,
    /// Maximum luminance-sample variance for L3.
    pub epsilon_l: f64,
    /// Maximum per-channel Lab variance for L3-strict.
    pub epsilon_lab: f64,
    /// Minimum baseline/depth ratio for two observations to count as
    /// distinct viewpoints.
    pub r_min: f64,
    /// Minimum angular separation (radians) for distinct viewpoints.
    pub theta_min: f64,
    /// Floor below which a depth average is treated as non-finite for
    /// distinct-viewpoint purposes.
    pub epsilon_finite: f64,
}

impl Default for ValidityConstants {
    fn default() -> Self {
        Self {
            epsilon_area: 1e-4,
            epsilon_rep: 2.0,
            epsilon_geom: 1e-3,
            epsilon_depth: 1e-2,
            epsilon_l: 4.0,
            epsilon_lab: 2.0,
            r_min: 0.02,
            theta_min: 0.05,
            epsilon_finite: 1e-6,
        }
    }
}
