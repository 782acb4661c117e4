//! Per-patch evidence accumulation, monotonic session display state, and
//! canonical snapshot export.
//!
//! [`EvidenceEngine`] is the single mutable owner of all patch and display
//! state for one session, enforced the idiomatic-Rust way: every mutating
//! method takes `&mut self`, so the borrow checker — not a runtime lock —
//! is what prevents concurrent writers. Read-only [`EngineSnapshot`]s are
//! plain owned values, freely shareable once produced.

#![forbid(unsafe_code)]

mod constants;
mod engine;
mod export;
mod visual_state;

pub use constants::EvidenceThresholds;
pub use engine::{EvidenceEngine, Verdict};
pub use export::EngineSnapshot;
pub use visual_state::VisualState;
