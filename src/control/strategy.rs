//! Steering strategies.
//!
//! Two controllers sit behind the same interface: the full bilateral
//! fusion controller (weighted left/right asymmetry per channel, optional
//! vision term, saturating drive mapping) and a degenerate single-scalar
//! gradient climber that perturbs its heading whenever intensity drops.

use std::f64::consts::FRAC_PI_4;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ControllerConfig;
use crate::control::actuation::{drive_command, saturate, ActuationCommand};
use crate::control::sensors::{combined_bias, SensorFrame, VisionFrame};

/// Everything the embodiment reports per physics step.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub odor: SensorFrame,
    pub vision: Option<VisionFrame>,
}

/// What a steering strategy asks of the embodiment for the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringCommand {
    /// Per-side drive signals; imbalance produces the turn.
    Differential(ActuationCommand),
    /// Absolute heading plus forward speed, for embodiments steered by yaw.
    Heading { heading: f64, speed: f64 },
}

/// One decision tick's output: the command plus the scalar bias that
/// produced it, exposed for the observation stream.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub command: SteeringCommand,
    pub bias: f64,
}

/// A reactive steering policy evaluated once per decision tick.
pub trait SteeringController {
    fn decide(&mut self, observation: &Observation) -> Decision;
}

/// Full sensor-fusion controller: bilateral odor channels plus the
/// optional vision term, mapped to a differential drive command.
///
/// Stateless between ticks; every decision is recomputed from the frame.
#[derive(Debug, Clone)]
pub struct BilateralController {
    config: ControllerConfig,
}

impl BilateralController {
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }
}

impl SteeringController for BilateralController {
    fn decide(&mut self, observation: &Observation) -> Decision {
        let bias = combined_bias(&observation.odor, observation.vision.as_ref(), &self.config);
        let b = saturate(bias);
        let command = drive_command(b, self.config.delta_min, self.config.delta_max);
        Decision {
            command: SteeringCommand::Differential(command),
            bias,
        }
    }
}

/// Degenerate stochastic hill climber over a single scalar intensity.
///
/// Keeps the previous tick's intensity; when the current reading is
/// weaker, the heading is kicked by a uniform draw from `[-pi/4, pi/4]`.
/// Speed tracks intensity, clamped to `[floor, 1.0]`.
#[derive(Debug, Clone)]
pub struct GradientClimber {
    heading: f64,
    last_intensity: f64,
    speed_floor: f64,
    rng: SmallRng,
}

impl GradientClimber {
    #[must_use]
    pub fn new(seed: u64, speed_floor: f64) -> Self {
        Self {
            heading: 0.0,
            last_intensity: 0.0,
            speed_floor,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Advances the climber one tick and returns `(heading, speed)`.
    pub fn update(&mut self, intensity: f64) -> (f64, f64) {
        if intensity < self.last_intensity {
            self.heading += self.rng.random_range(-FRAC_PI_4..=FRAC_PI_4);
        }
        let speed = (intensity * 2.0).clamp(self.speed_floor, 1.0);
        self.last_intensity = intensity;
        (self.heading, speed)
    }
}

impl SteeringController for GradientClimber {
    fn decide(&mut self, observation: &Observation) -> Decision {
        let intensity = observation.odor.mean_intensity();
        let bias = intensity - self.last_intensity;
        let (heading, speed) = self.update(intensity);
        Decision {
            command: SteeringCommand::Heading { heading, speed },
            bias,
        }
    }
}
