//! Fixed-rate decision loop.
//!
//! One tick: ask the controller for a command, hold it for
//! `floor(decision_interval / physics_timestep)` embodiment substeps, and
//! after every substep record the sample and evaluate the termination
//! predicate. The loop runs at most `ceil(total_time / decision_interval)`
//! ticks and always reports how it ended: target reached, tick budget
//! exhausted, or aborted by an embodiment failure.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::{ConfigError, ControllerConfig};
use crate::control::strategy::{Observation, SteeringCommand, SteeringController};

/// Agent position reported by the embodiment. The vertical axis is carried
/// but ignored by the termination predicate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Euclidean distance to a planar target, ignoring the vertical axis.
    #[must_use]
    pub fn planar_distance(&self, target: [f64; 2]) -> f64 {
        let dx = self.x - target[0];
        let dy = self.y - target[1];
        dx.hypot(dy)
    }
}

/// Failures reported by the embodiment. The loop surfaces them as the
/// [`RunOutcome::Aborted`] outcome rather than unwinding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbodimentError {
    #[error("agent state became non-finite at physics step {step}")]
    NonFinite { step: u64 },
    #[error("embodiment failure: {0}")]
    Failure(String),
}

/// What one embodiment substep produces.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub observation: Observation,
    pub position: Position,
    /// Environment-initiated episode end, distinct from a failure.
    pub done: bool,
}

/// The boundary contract to the body/environment collaborator.
pub trait Embodiment {
    /// Puts the agent back at its spawn pose and returns the first
    /// observation.
    fn reset(&mut self) -> Result<Observation, EmbodimentError>;

    /// Advances physics by one substep under the held command.
    fn step(&mut self, command: &SteeringCommand) -> Result<StepOutput, EmbodimentError>;

    /// Current agent position.
    fn position(&self) -> Position;
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The agent came within the termination radius of a target.
    ReachedTarget,
    /// Every decision tick elapsed (or the environment ended the episode)
    /// without reaching a target.
    BudgetExhausted,
    /// The embodiment reported an unrecoverable failure.
    Aborted(EmbodimentError),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReachedTarget => write!(f, "reached target"),
            Self::BudgetExhausted => write!(f, "tick budget exhausted"),
            Self::Aborted(err) => write!(f, "aborted: {err}"),
        }
    }
}

/// Summary handed back to the caller after every run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Decision ticks started.
    pub ticks: u64,
    /// Physics substeps executed.
    pub substeps: u64,
    pub final_position: Position,
}

/// One record of the append-only observation stream.
#[derive(Debug, Clone, Copy)]
pub struct TraceSample {
    pub tick: u64,
    pub substep: u64,
    pub bias: f64,
    pub command: SteeringCommand,
    pub position: Position,
}

/// Consumer of per-substep samples (CSV logger, plotter, test probe).
pub trait TraceSink {
    fn record(&mut self, sample: &TraceSample);
}

/// Discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _sample: &TraceSample) {}
}

/// Wall-clock rate limiter for interactive runs. Purely a pacing device;
/// batch runs simply construct the loop without one.
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    last: Instant,
}

impl Pacer {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    /// Sleeps out the remainder of the current period, if any.
    pub fn pace(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

/// Owns the validated configuration and drives the decision loop.
pub struct Runner {
    config: ControllerConfig,
    pacer: Option<Pacer>,
}

impl Runner {
    /// Validates the configuration up front; every violation is fatal here,
    /// never mid-run.
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            pacer: None,
        })
    }

    /// Enables real-time pacing at one decision tick per `period`.
    #[must_use]
    pub fn with_pacer(mut self, period: Duration) -> Self {
        self.pacer = Some(Pacer::new(period));
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Runs the loop to completion against the given embodiment and
    /// strategy, streaming every substep into `sink`.
    ///
    /// A sensor-frame shape that contradicts the configuration is a
    /// [`ConfigError`]; embodiment failures end the run with the
    /// [`RunOutcome::Aborted`] outcome instead.
    pub fn run<E, C, S>(
        &mut self,
        embodiment: &mut E,
        controller: &mut C,
        sink: &mut S,
    ) -> Result<RunReport, ConfigError>
    where
        E: Embodiment,
        C: SteeringController + ?Sized,
        S: TraceSink,
    {
        let mut observation = match embodiment.reset() {
            Ok(observation) => observation,
            Err(err) => {
                return Ok(RunReport {
                    outcome: RunOutcome::Aborted(err),
                    ticks: 0,
                    substeps: 0,
                    final_position: embodiment.position(),
                })
            }
        };
        self.config.check_frame(&observation.odor)?;

        let substeps_per_tick = self.config.substeps_per_decision();
        let max_ticks = self.config.max_ticks();
        let mut substeps = 0u64;

        for tick in 0..max_ticks {
            let decision = controller.decide(&observation);

            for substep in 0..substeps_per_tick {
                let output = match embodiment.step(&decision.command) {
                    Ok(output) => output,
                    Err(err) => {
                        return Ok(RunReport {
                            outcome: RunOutcome::Aborted(err),
                            ticks: tick + 1,
                            substeps,
                            final_position: embodiment.position(),
                        })
                    }
                };
                substeps += 1;
                sink.record(&TraceSample {
                    tick,
                    substep,
                    bias: decision.bias,
                    command: decision.command,
                    position: output.position,
                });

                if self.reached(output.position) {
                    return Ok(RunReport {
                        outcome: RunOutcome::ReachedTarget,
                        ticks: tick + 1,
                        substeps,
                        final_position: output.position,
                    });
                }
                if output.done {
                    return Ok(RunReport {
                        outcome: RunOutcome::BudgetExhausted,
                        ticks: tick + 1,
                        substeps,
                        final_position: output.position,
                    });
                }
                observation = output.observation;
            }

            if let Some(pacer) = &mut self.pacer {
                pacer.pace();
            }
        }

        Ok(RunReport {
            outcome: RunOutcome::BudgetExhausted,
            ticks: max_ticks,
            substeps,
            final_position: embodiment.position(),
        })
    }

    fn reached(&self, position: Position) -> bool {
        let Some(radius) = self.config.termination_radius else {
            return false;
        };
        self.config
            .targets
            .iter()
            .any(|target| position.planar_distance(*target) < radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_vertical() {
        let position = Position {
            x: 3.0,
            y: 4.0,
            z: 100.0,
        };
        assert!((position.planar_distance([0.0, 0.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(RunOutcome::ReachedTarget.to_string(), "reached target");
        assert_eq!(
            RunOutcome::BudgetExhausted.to_string(),
            "tick budget exhausted"
        );
        let aborted = RunOutcome::Aborted(EmbodimentError::NonFinite { step: 12 });
        assert_eq!(
            aborted.to_string(),
            "aborted: agent state became non-finite at physics step 12"
        );
    }
}
