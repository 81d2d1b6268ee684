//! The control law: sensor fusion, saturation, and steering strategies.
//!
//! ```text
//! frame -> combined_bias -> tanh(bias^2) * sign(bias) -> drive command
//! ```
//!
//! `sensors` reduces bilateral receptor groups to one normalized bias,
//! `actuation` squashes and maps it to a differential drive, `strategy`
//! packages both behind the [`SteeringController`] interface together with
//! the degenerate gradient-climbing variant.

pub mod actuation;
pub mod sensors;
pub mod strategy;

pub use actuation::{drive_command, saturate, ActuationCommand};
pub use sensors::{combined_bias, weighted_average, BilateralSample, SensorFrame, VisionFrame};
pub use strategy::{
    BilateralController, Decision, GradientClimber, Observation, SteeringCommand,
    SteeringController,
};
