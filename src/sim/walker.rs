//! Kinematic walking body implementing the embodiment boundary contract.
//!
//! Two receptor ranks per side (a long forward mast and a short one,
//! mirroring antenna and palp) sample every arena channel; a differential
//! drive command turns the body toward the slower side, an absolute
//! heading command snaps the heading directly.

use std::f64::consts::TAU;

use crate::control::actuation::ActuationCommand;
use crate::control::sensors::{BilateralSample, SensorFrame, VisionFrame};
use crate::control::strategy::{Observation, SteeringCommand};
use crate::params::{ANTENNA_DIST, PALP_DIST, SENSOR_ANGLE, WALKER_SPEED, WALKER_TURN_GAIN};
use crate::runner::{Embodiment, EmbodimentError, Position, StepOutput};
use crate::sim::arena::Arena;

/// Height above ground the receptors sample at.
const RECEPTOR_HEIGHT: f64 = 0.5;

/// Point-body walker with a heading and bilateral receptor masts.
#[derive(Debug)]
pub struct Walker {
    arena: Arena,
    timestep: f64,
    vision: bool,
    spawn: (f64, f64, f64),
    x: f64,
    y: f64,
    heading: f64,
    steps: u64,
}

impl Walker {
    /// Places a walker at the origin facing +x.
    #[must_use]
    pub fn new(arena: Arena, timestep: f64, vision: bool) -> Self {
        Self {
            arena,
            timestep,
            vision,
            spawn: (0.0, 0.0, 0.0),
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            steps: 0,
        }
    }

    /// Overrides the spawn pose (x, y, heading).
    #[must_use]
    pub fn with_spawn(mut self, x: f64, y: f64, heading: f64) -> Self {
        self.spawn = (x, y, heading);
        self.x = x;
        self.y = y;
        self.heading = heading;
        self
    }

    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    fn receptor(&self, side_angle: f64, dist: f64) -> [f64; 3] {
        let angle = self.heading + side_angle;
        [
            self.x + dist * angle.cos(),
            self.y + dist * angle.sin(),
            RECEPTOR_HEIGHT,
        ]
    }

    fn observe(&mut self) -> Observation {
        let left_points = [
            self.receptor(SENSOR_ANGLE, ANTENNA_DIST),
            self.receptor(SENSOR_ANGLE, PALP_DIST),
        ];
        let right_points = [
            self.receptor(-SENSOR_ANGLE, ANTENNA_DIST),
            self.receptor(-SENSOR_ANGLE, PALP_DIST),
        ];

        let channels = (0..self.arena.channels())
            .map(|channel| BilateralSample {
                left: left_points
                    .iter()
                    .map(|&p| self.arena.intensity(channel, p))
                    .collect(),
                right: right_points
                    .iter()
                    .map(|&p| self.arena.intensity(channel, p))
                    .collect(),
            })
            .collect();

        let vision = self.vision.then(|| VisionFrame {
            left_brightness: self.arena.brightness([self.x, self.y], self.heading, true),
            right_brightness: self.arena.brightness([self.x, self.y], self.heading, false),
        });

        Observation {
            odor: SensorFrame { channels },
            vision,
        }
    }

    fn advance(&mut self, command: &SteeringCommand) {
        match command {
            SteeringCommand::Differential(ActuationCommand { left, right }) => {
                // Slowing one side turns toward it; positive heading is a
                // left (counter-clockwise) turn.
                self.heading += WALKER_TURN_GAIN * (right - left) * self.timestep;
                let speed = WALKER_SPEED * f64::midpoint(*left, *right);
                self.x += speed * self.heading.cos() * self.timestep;
                self.y += speed * self.heading.sin() * self.timestep;
            }
            SteeringCommand::Heading { heading, speed } => {
                self.heading = *heading;
                let speed = WALKER_SPEED * speed;
                self.x += speed * self.heading.cos() * self.timestep;
                self.y += speed * self.heading.sin() * self.timestep;
            }
        }
        self.heading = self.heading.rem_euclid(TAU);
    }
}

impl Embodiment for Walker {
    fn reset(&mut self) -> Result<Observation, EmbodimentError> {
        let (x, y, heading) = self.spawn;
        self.x = x;
        self.y = y;
        self.heading = heading;
        self.steps = 0;
        Ok(self.observe())
    }

    fn step(&mut self, command: &SteeringCommand) -> Result<StepOutput, EmbodimentError> {
        self.advance(command);
        self.steps += 1;
        if !(self.x.is_finite() && self.y.is_finite() && self.heading.is_finite()) {
            return Err(EmbodimentError::NonFinite { step: self.steps });
        }
        Ok(StepOutput {
            observation: self.observe(),
            position: self.position(),
            done: false,
        })
    }

    fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
            z: 0.0,
        }
    }
}
