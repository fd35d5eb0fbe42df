//! Console Access Control
//!
//! - **policy**: role-to-surface matrix, shared by the route gate and
//!   the navigation sidebar
//! - **gate**: session + directory-row resolution in front of every
//!   gated surface

mod gate;
mod policy;

pub use gate::{AccessGate, GateDecision};
pub use policy::{can_access, home_surface, Surface};
