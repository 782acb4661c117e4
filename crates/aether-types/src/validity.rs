//! Closed taxonomy of validity outcomes produced by `ValidityModel`.

/// The closed set of 14 reasons an observation (or pair/group of
/// observations) can fail validation. Each tag corresponds to exactly one
/// rejection rule in the validity tiers (§4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidReason {
    /// A required geometric field was not finite.
    NonFiniteInput,
    /// The ray did not intersect scene geometry.
    NoGeometricIntersection,
    /// Projected overlap area fell below the configured minimum.
    InsufficientOverlapArea,
    /// The patch was fully occluded at capture time.
    FullyOccluded,
    /// Fewer than two L1-valid observations were available.
    InsufficientMultiViewSupport,
    /// The baseline-to-depth parallax ratio fell below the configured
    /// minimum for a candidate pair of viewpoints.
    ParallaxThresholdNotMet,
    /// Fewer than three depth samples were available.
    MissingDepthMeasurement,
    /// No pair metrics were available for any L1-valid pair.
    MissingPairMetrics,
    /// Reprojection error exceeded the configured threshold.
    ReprojectionErrorExceeded,
    /// Triangulated geometric variance exceeded the configured threshold.
    GeometricVarianceExceeded,
    /// Fewer than three mutually distinct viewpoints were selected.
    InsufficientDistinctViewpoints,
    /// Depth variance across selected samples exceeded the configured
    /// threshold.
    DepthVarianceExceeded,
    /// Luminance sample count was below three, or luminance variance
    /// exceeded the configured threshold.
    LuminanceVarianceExceeded,
    /// Maximum per-channel Lab variance exceeded the configured threshold.
    LabVarianceExceeded,
}

/// The outcome of classifying an observation (or group of observations)
/// against the validity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidityOutcome {
    /// Validation failed for the given reason.
    Invalid(InvalidReason),
    /// Geometrically plausible.
    L1,
    /// Multi-view supported.
    L2,
    /// Photometrically consistent with a partial (< 3) Lab sample set.
    L3Core,
    /// Photometrically consistent with a full Lab sample set.
    L3Strict,
}

impl ValidityOutcome {
    /// Returns `true` if this outcome represents any successful
    /// classification (not `Invalid`).
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}
