//! Pure validity classification (L1/L2/L3) and the EEB evidence-level
//! state machine.
//!
//! Neither surface holds state: every function takes its constants table
//! as an explicit argument, per the "model itself is constant-free"
//! contract.

#![forbid(unsafe_code)]

mod constants;
mod eeb;
mod model;

pub use constants::ValidityConstants;
pub use eeb::{allows, Trigger};
pub use model::{distinct_viewpoints, l1, l2, l3};
