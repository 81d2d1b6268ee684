//! Simulated collaborators: the stimulus arena and the walking body.
//!
//! These stand in for the out-of-scope physics/rendering stack so the
//! control core can be exercised end to end.

pub mod arena;
pub mod walker;

pub use arena::{Arena, Obstacle, OdorSource};
pub use walker::Walker;
