//! Three-component double-precision vector and its unit-length invariant.

use core::fmt;

/// Tolerance used when validating that a [`Vec3`] used as a `forward`
/// direction is (approximately) unit length. See [`Vec3::into_unit`].
pub const EPSILON_UNIT: f64 = 1e-6;

/// A position or direction in world space.
///
/// `Vec3` carries no unit constraint on its own — it is used both for
/// *positions* (no constraint) and for *forward* directions (must be unit
/// length within [`EPSILON_UNIT`], checked once at construction via
/// [`Vec3::into_unit`] and never re-checked afterward).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    x: f64,
    y: f64,
    z: f64,
}

/// Error returned when a [`Vec3`] fails the unit-length invariant required
/// of a `forward` direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3Error {
    /// `|‖v‖ − 1|`, the amount by which the vector missed the unit-length
    /// tolerance.
    pub deviation: f64,
}

impl fmt::Display for Vec3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vector is not unit length within {EPSILON_UNIT}: deviation {}",
            self.deviation
        )
    }
}

impl std::error::Error for Vec3Error {}

impl Vec3 {
    /// Constructs a vector from components. No finiteness or unit-length
    /// check is performed; callers that need either must check explicitly
    /// ([`Vec3::is_finite`], [`Vec3::into_unit`]).
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The x component.
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The y component.
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// The z component.
    pub const fn z(&self) -> f64 {
        self.z
    }

    /// Returns `true` if all three components are finite (not NaN, not
    /// infinite).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise addition.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise subtraction.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Dot product.
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Validates this vector as a `forward` direction: `|‖v‖ − 1| ≤
    /// EPSILON_UNIT`. On success, returns the vector unchanged — the
    /// invariant is checked exactly once at this boundary and is never
    /// re-verified by downstream code, per the data model's attribute
    /// invariant for `forward`.
    pub fn into_unit(self) -> Result<Self, Vec3Error> {
        let deviation = (self.length() - 1.0).abs();
        if deviation <= EPSILON_UNIT {
            Ok(self)
        } else {
            Err(Vec3Error { deviation })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vector_accepted() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(v.into_unit(), Ok(v));
    }

    #[test]
    fn near_unit_vector_within_epsilon_accepted() {
        let v = Vec3::new(1.0 - 1e-7, 0.0, 0.0);
        assert!(v.into_unit().is_ok());
    }

    #[test]
    fn non_unit_vector_rejected() {
        let v = Vec3::new(2.0, 0.0, 0.0);
        assert!(v.into_unit().is_err());
    }

    #[test]
    fn non_finite_vector_detected() {
        let v = Vec3::new(f64::NAN, 0.0, 0.0);
        assert!(!v.is_finite());
    }

    #[test]
    fn position_vector_has_no_unit_constraint() {
        let v = Vec3::new(1000.0, -500.0, 3.0);
        assert!(v.is_finite());
    }
}
