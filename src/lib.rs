//! Reactive bilateral taxis controller for a simulated walking agent.
//!
//! Noisy left/right odor (and optionally brightness) readings are fused
//! into one normalized steering bias, squashed through a saturating odd
//! nonlinearity, and emitted as a differential drive command on a decision
//! clock decoupled from the physics clock. A degenerate single-scalar
//! gradient climber shares the same controller interface.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod control;
pub mod params;
pub mod runner;
pub mod sim;
