//! The immutable per-frame [`Observation`] and its nested value types.

use crate::vec3::Vec3;

/// Occlusion state of an observed patch at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OcclusionState {
    /// The patch was fully visible.
    NotOccluded,
    /// Part of the patch was occluded.
    PartiallyOccluded,
    /// The patch was entirely occluded.
    FullyOccluded,
}

/// Sensor pose at the moment an observation was captured.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorPose {
    /// World-space sensor position (no unit constraint).
    pub position: Vec3,
    /// World-space sensor forward direction (unit length, validated once at
    /// construction via [`Vec3::into_unit`]).
    pub forward: Vec3,
}

/// A ray cast from the sensor toward the observed patch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    /// Ray origin in world space.
    pub origin: Vec3,
    /// Ray direction in world space.
    pub direction: Vec3,
    /// World-space intersection point, if the ray met scene geometry.
    pub intersection: Option<Vec3>,
    /// Projected overlap area between the observation footprint and the
    /// patch, in the capture layer's area unit.
    pub projected_overlap_area: f64,
}

/// CIE Lab color sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lab {
    /// Lightness channel.
    pub l: f64,
    /// Green–red channel.
    pub a: f64,
    /// Blue–yellow channel.
    pub b: f64,
}

/// Raw per-frame measurement bundle, largely optional: producers report
/// whatever their sensor stack could measure this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSample {
    /// Measured depth in meters, if available.
    pub depth_m: Option<f64>,
    /// Measured luminance (CIE L*), if available.
    pub luminance_l_star: Option<f64>,
    /// Measured Lab color sample, if available.
    pub lab: Option<Lab>,
    /// Number of raw sensor samples the measurement was derived from.
    pub sample_count: i32,
}

/// An immutable per-frame observation of a spatial patch.
///
/// Produced by the external capture layer, never mutated, and consumed by
/// `ValidityModel` and `EvidenceEngine`. Equality and ordering (where
/// needed, e.g. in L3 candidate selection) are by `(timestamp_ms, patch_id,
/// id)`, not by structural identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// Wire schema version this observation was produced under.
    pub schema_version: u16,
    /// Opaque, producer-assigned observation identifier.
    pub id: String,
    /// Capture timestamp, milliseconds, caller-supplied monotonic clock.
    pub timestamp_ms: i64,
    /// Identifier of the spatial patch this observation targets.
    pub patch_id: String,
    /// Sensor pose at capture time.
    pub sensor_pose: SensorPose,
    /// Ray cast toward the patch.
    pub ray: Ray,
    /// Raw sensor measurements for this frame.
    pub raw: RawSample,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Occlusion state at capture time.
    pub occlusion: OcclusionState,
}

impl Observation {
    /// Returns `true` if the geometric fields required by L1 (position,
    /// forward, ray origin/direction, overlap area) are all finite.
    pub fn geometry_finite(&self) -> bool {
        self.sensor_pose.position.is_finite()
            && self.sensor_pose.forward.is_finite()
            && self.ray.origin.is_finite()
            && self.ray.direction.is_finite()
            && self.ray.projected_overlap_area.is_finite()
    }

    /// Sort key used for deterministic L3 candidate selection:
    /// `(timestamp_ms, patch_id, id)`.
    pub fn selection_key(&self) -> (i64, &str, &str) {
        (self.timestamp_ms, self.patch_id.as_str(), self.id.as_str())
    }
}
