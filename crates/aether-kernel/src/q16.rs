//! Q16.16 fixed-point arithmetic with overflow saturation.
//!
//! The raw representation is a `i64` holding a value scaled by `2^16`.
//! Every arithmetic operation saturates at `Q16::MAX`/`Q16::MIN` instead of
//! wrapping, and a dedicated `INVALID` sentinel propagates through any
//! operation that cannot produce a meaningful result (conversion from a
//! non-finite `f64`, or either operand to a binary op already invalid).
//! Division by zero saturates like any other overflow rather than
//! producing `INVALID`; see [`Q16::div`].
//!
//! `f64` to `Q16` conversion rounds half-to-even (banker's rounding) to
//! match the only rounding mode this system's determinism contract
//! permits, not Rust's own `f64::round` (half-away-from-zero).

const FRACTIONAL_BITS: u32 = 16;
const SCALE: i64 = 1 << FRACTIONAL_BITS;

/// Rounds to the nearest integer, ties to even. `f64::round_ties_even` is
/// stable only since Rust 1.77; this workspace's MSRV is 1.74.
fn round_ties_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff < 0.5 {
        floor
    } else if diff > 0.5 {
        floor + 1.0
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

/// A Q16.16 fixed-point value.
///
/// `Eq`/`Hash` are derived on the raw bit pattern: `INVALID` compares equal
/// only to itself, which matches its role as a sentinel rather than a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Q16(i64);

impl Q16 {
    /// The largest finite representable value.
    pub const MAX: Q16 = Q16(i64::MAX - 1);
    /// The smallest finite representable value.
    pub const MIN: Q16 = Q16(i64::MIN + 2);
    /// Additive identity.
    pub const ZERO: Q16 = Q16(0);
    /// Multiplicative identity.
    pub const ONE: Q16 = Q16(SCALE);
    /// Sentinel for an operation that could not produce a meaningful
    /// result. Distinct from every finite value; not ordered.
    pub const INVALID: Q16 = Q16(i64::MIN + 1);

    /// Builds a `Q16` directly from a raw `2^16`-scaled integer. Reserved
    /// raw values used by [`Q16::INVALID`] and the saturation bounds are
    /// left intact rather than re-clamped, since callers constructing from
    /// raw bits are expected to already be in range.
    pub const fn from_raw(raw: i64) -> Self {
        Q16(raw)
    }

    /// The raw `2^16`-scaled integer backing this value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// True unless this is [`Q16::INVALID`].
    pub fn is_valid(self) -> bool {
        self.0 != Q16::INVALID.0
    }

    /// Converts an `f64` to `Q16`, saturating at the representable range
    /// and mapping any non-finite input to [`Q16::INVALID`].
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Q16::INVALID;
        }
        let scaled = value * SCALE as f64;
        if scaled >= Q16::MAX.0 as f64 {
            return Q16::MAX;
        }
        if scaled <= Q16::MIN.0 as f64 {
            return Q16::MIN;
        }
        Q16(round_ties_even(scaled) as i64)
    }

    /// Converts this value back to an `f64`. Returns `f64::NAN` for
    /// [`Q16::INVALID`].
    pub fn to_f64(self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }
        self.0 as f64 / SCALE as f64
    }

    /// Converts an integer to `Q16`, saturating at the representable
    /// range.
    pub fn from_i32(value: i32) -> Self {
        let scaled = (value as i64).saturating_mul(SCALE);
        Q16(scaled.clamp(Q16::MIN.0, Q16::MAX.0))
    }

    fn checked_binary<F>(self, other: Q16, op: F) -> Q16
    where
        F: Fn(i64, i64) -> Option<i64>,
    {
        if !self.is_valid() || !other.is_valid() {
            return Q16::INVALID;
        }
        match op(self.0, other.0) {
            Some(result) => Q16(result.clamp(Q16::MIN.0, Q16::MAX.0)),
            None => {
                // Overflow: saturate toward the sign of the true result.
                if (self.0 >= 0) == (other.0 >= 0) {
                    if self.0 >= 0 {
                        Q16::MAX
                    } else {
                        Q16::MIN
                    }
                } else {
                    Q16::ZERO
                }
            }
        }
    }

    /// Saturating addition. Propagates [`Q16::INVALID`].
    pub fn add(self, other: Q16) -> Q16 {
        self.checked_binary(other, |a, b| a.checked_add(b))
    }

    /// Saturating subtraction. Propagates [`Q16::INVALID`].
    pub fn sub(self, other: Q16) -> Q16 {
        self.checked_binary(other, |a, b| a.checked_sub(b))
    }

    /// Saturating multiplication. Uses a native `i128` widening multiply
    /// (the host has no portability reason to hand-roll a 64x64→128
    /// split-word multiply) then rescales by `2^16` before narrowing back
    /// to `i64`, saturating on overflow.
    pub fn mul(self, other: Q16) -> Q16 {
        if !self.is_valid() || !other.is_valid() {
            return Q16::INVALID;
        }
        let wide = (self.0 as i128) * (other.0 as i128);
        let rescaled = wide >> FRACTIONAL_BITS;
        if rescaled > Q16::MAX.0 as i128 {
            Q16::MAX
        } else if rescaled < Q16::MIN.0 as i128 {
            Q16::MIN
        } else {
            Q16(rescaled as i64)
        }
    }

    /// Saturating division. Propagates [`Q16::INVALID`] if either operand
    /// already is; division by zero saturates to `±MAX` by the sign of
    /// the dividend (zero treated as non-negative) rather than producing
    /// `INVALID`.
    pub fn div(self, other: Q16) -> Q16 {
        if !self.is_valid() || !other.is_valid() {
            return Q16::INVALID;
        }
        if other.0 == 0 {
            return if self.0 >= 0 { Q16::MAX } else { Q16::MIN };
        }
        let wide = (self.0 as i128) << FRACTIONAL_BITS;
        let result = wide / (other.0 as i128);
        if result > Q16::MAX.0 as i128 {
            Q16::MAX
        } else if result < Q16::MIN.0 as i128 {
            Q16::MIN
        } else {
            Q16(result as i64)
        }
    }

    /// Clamps to `[lo, hi]`. Passes [`Q16::INVALID`] through unchanged.
    pub fn clamp(self, lo: Q16, hi: Q16) -> Q16 {
        if !self.is_valid() {
            return self;
        }
        Q16(self.0.clamp(lo.0, hi.0))
    }

    /// Clamps to `[0, 1]`. Passes [`Q16::INVALID`] through unchanged.
    pub fn clamp_unit(self) -> Q16 {
        self.clamp(Q16::ZERO, Q16::ONE)
    }
}

impl Default for Q16 {
    fn default() -> Self {
        Q16::ZERO
    }
}
