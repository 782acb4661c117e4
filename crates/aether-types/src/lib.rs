//! Shared data model for the Aether decision engine.
//!
//! This crate defines the scalar fields and core entities from the
//! system's data model: [`Vec3`], [`Observation`], [`PairMetrics`],
//! [`ValidityOutcome`], [`EebLevel`], [`PatchEntry`], and the wire-level
//! scalar aliases ([`Digest`], [`SchemaVersion`], [`LayoutVersion`]).
//!
//! Every type here is a plain value type: no I/O, no hidden state, no
//! wall-clock reads. Timestamps are always caller-supplied `i64`
//! milliseconds, per the determinism contract.

#![forbid(unsafe_code)]

mod eeb_level;
mod observation;
mod pair_metrics;
mod patch;
mod validity;
mod vec3;

pub use eeb_level::EebLevel;
pub use observation::{Lab, Observation, OcclusionState, RawSample, Ray, SensorPose};
pub use pair_metrics::{canonical_pair_key, PairKey, PairMetrics};
pub use patch::PatchEntry;
pub use validity::{InvalidReason, ValidityOutcome};
pub use vec3::{Vec3, Vec3Error};

/// A 32-byte opaque content hash produced by the canonical digest function.
pub type Digest = [u8; 32];

/// Big-endian 16-bit schema tag carried on every canonical record.
pub type SchemaVersion = u16;

/// Single-byte layout version tag. The only value defined by this spec is `1`.
pub type LayoutVersion = u8;

/// Current layout version emitted by this implementation.
pub const CURRENT_LAYOUT_VERSION: LayoutVersion = 1;

/// Schema version threshold at which strict length validation and mandatory
/// decision-hash computation become required (§6).
pub const STRICT_SCHEMA_VERSION_MIN: SchemaVersion = 0x0204;
