//! Run configuration and startup validation.
//!
//! A [`ControllerConfig`] is built once, validated once, and then owned
//! immutably by the decision loop for the whole run. Anything that can be
//! caught before the first physics step is a [`ConfigError`], surfaced
//! immediately and never retried.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::sensors::SensorFrame;
use crate::params::{
    ATTRACTIVE_GAIN, ATTRACTIVE_WEIGHTS, AVERSIVE_GAIN, AVERSIVE_WEIGHTS, DECISION_INTERVAL,
    DELTA_MAX, DELTA_MIN, PHYSICS_TIMESTEP, TERMINATION_RADIUS, TOTAL_TIME,
};

/// One stimulus modality: its steering gain and per-receptor weights.
///
/// The weight vector length fixes the receptor-group length the sensor
/// frames must carry for this channel. Weights need not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub gain: f64,
    pub weights: Vec<f64>,
}

/// Immutable configuration for one run of the decision loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Stimulus channels, in the order the embodiment reports them.
    pub channels: Vec<ChannelConfig>,
    /// Gain for the bilateral brightness difference; `None` disables the
    /// vision term entirely.
    #[serde(default)]
    pub vision_gain: Option<f64>,
    /// Lower bound of each side's drive signal.
    pub delta_min: f64,
    /// Upper bound of each side's drive signal.
    pub delta_max: f64,
    /// Seconds between control decisions.
    pub decision_interval: f64,
    /// Seconds per embodiment physics substep.
    pub physics_timestep: f64,
    /// Total simulated seconds before the tick budget is exhausted.
    pub total_time: f64,
    /// Arrival distance; `None` disables the termination predicate.
    #[serde(default)]
    pub termination_radius: Option<f64>,
    /// Planar target positions checked by the termination predicate.
    #[serde(default)]
    pub targets: Vec<[f64; 2]>,
    /// Seed for every random source owned by the run.
    #[serde(default)]
    pub random_seed: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            channels: vec![
                ChannelConfig {
                    gain: ATTRACTIVE_GAIN,
                    weights: ATTRACTIVE_WEIGHTS.to_vec(),
                },
                ChannelConfig {
                    gain: AVERSIVE_GAIN,
                    weights: AVERSIVE_WEIGHTS.to_vec(),
                },
            ],
            vision_gain: None,
            delta_min: DELTA_MIN,
            delta_max: DELTA_MAX,
            decision_interval: DECISION_INTERVAL,
            physics_timestep: PHYSICS_TIMESTEP,
            total_time: TOTAL_TIME,
            termination_radius: Some(TERMINATION_RADIUS),
            targets: vec![[24.0, 6.0], [24.0, -6.0]],
            random_seed: 0,
        }
    }
}

/// Fatal configuration problems. None of these are recoverable at runtime.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("delta_min {min} exceeds delta_max {max}")]
    DeltaRange { min: f64, max: f64 },
    #[error("decision_interval must be positive, got {0}")]
    NonPositiveInterval(f64),
    #[error("physics_timestep must be positive, got {0}")]
    NonPositiveTimestep(f64),
    #[error("decision_interval {interval} is shorter than one physics step {timestep}")]
    IntervalTooShort { interval: f64, timestep: f64 },
    #[error("total_time must be non-negative, got {0}")]
    NegativeRunTime(f64),
    #[error("no stimulus channels configured")]
    NoChannels,
    #[error("channel {channel} has an empty weight vector")]
    EmptyWeights { channel: usize },
    #[error("channel {channel} weights sum to zero")]
    ZeroWeightSum { channel: usize },
    #[error("termination radius set but no target positions configured")]
    NoTargets,
    #[error("embodiment reports {got} channels, configuration expects {expected}")]
    ChannelCount { expected: usize, got: usize },
    #[error("channel {channel}: receptor group length {got} does not match weight vector length {expected}")]
    ReceptorCount {
        channel: usize,
        expected: usize,
        got: usize,
    },
}

impl ControllerConfig {
    /// Checks every startup invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delta_min > self.delta_max {
            return Err(ConfigError::DeltaRange {
                min: self.delta_min,
                max: self.delta_max,
            });
        }
        if self.decision_interval <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(self.decision_interval));
        }
        if self.physics_timestep <= 0.0 {
            return Err(ConfigError::NonPositiveTimestep(self.physics_timestep));
        }
        if self.decision_interval < self.physics_timestep {
            return Err(ConfigError::IntervalTooShort {
                interval: self.decision_interval,
                timestep: self.physics_timestep,
            });
        }
        if self.total_time < 0.0 {
            return Err(ConfigError::NegativeRunTime(self.total_time));
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.weights.is_empty() {
                return Err(ConfigError::EmptyWeights { channel: i });
            }
            if channel.weights.iter().sum::<f64>() == 0.0 {
                return Err(ConfigError::ZeroWeightSum { channel: i });
            }
        }
        if self.termination_radius.is_some() && self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(())
    }

    /// Physics substeps a decision is held for: `floor(interval / timestep)`.
    ///
    /// The epsilon keeps float noise in the quotient from dropping a
    /// substep when the interval is an exact multiple of the timestep.
    #[must_use]
    pub fn substeps_per_decision(&self) -> u64 {
        (self.decision_interval / self.physics_timestep + 1e-9).floor() as u64
    }

    /// Upper bound on decision ticks: `ceil(total_time / interval)`.
    ///
    /// The epsilon keeps float noise from rounding an exact multiple up to
    /// an extra tick.
    #[must_use]
    pub fn max_ticks(&self) -> u64 {
        (self.total_time / self.decision_interval - 1e-9).ceil().max(0.0) as u64
    }

    /// Verifies that a frame produced by the embodiment has the shape this
    /// configuration promises. A mismatch is a configuration error, not a
    /// recoverable runtime condition.
    pub fn check_frame(&self, frame: &SensorFrame) -> Result<(), ConfigError> {
        if frame.channels.len() != self.channels.len() {
            return Err(ConfigError::ChannelCount {
                expected: self.channels.len(),
                got: frame.channels.len(),
            });
        }
        for (i, (channel, sample)) in self.channels.iter().zip(&frame.channels).enumerate() {
            let expected = channel.weights.len();
            if sample.left.len() != expected || sample.right.len() != expected {
                return Err(ConfigError::ReceptorCount {
                    channel: i,
                    expected,
                    got: sample.left.len().max(sample.right.len()),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::sensors::BilateralSample;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_delta_range_rejected() {
        let cfg = ControllerConfig {
            delta_min: 1.0,
            delta_max: 0.2,
            ..ControllerConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DeltaRange { min: 1.0, max: 0.2 })
        );
    }

    #[test]
    fn test_non_positive_timing_rejected() {
        let cfg = ControllerConfig {
            decision_interval: -0.05,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveInterval(_))
        ));

        let cfg = ControllerConfig {
            physics_timestep: 0.0,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveTimestep(_))
        ));
    }

    #[test]
    fn test_interval_shorter_than_timestep_rejected() {
        let cfg = ControllerConfig {
            decision_interval: 1e-5,
            physics_timestep: 1e-4,
            ..ControllerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::IntervalTooShort { .. })
        ));
    }

    #[test]
    fn test_termination_without_targets_rejected() {
        let cfg = ControllerConfig {
            targets: Vec::new(),
            ..ControllerConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoTargets));

        // Disabling termination makes an empty target list legal.
        let cfg = ControllerConfig {
            targets: Vec::new(),
            termination_radius: None,
            ..ControllerConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_weight_sum_rejected() {
        let mut cfg = ControllerConfig::default();
        cfg.channels[1].weights = vec![0.0, 0.0];
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWeightSum { channel: 1 }));
    }

    #[test]
    fn test_substep_and_tick_counts() {
        let cfg = ControllerConfig::default();
        // 0.05 s interval at 1e-4 s per step.
        assert_eq!(cfg.substeps_per_decision(), 500);
        // 5 s total at 0.05 s per tick.
        assert_eq!(cfg.max_ticks(), 100);
    }

    #[test]
    fn test_frame_shape_mismatch_detected() {
        let cfg = ControllerConfig::default();
        let frame = SensorFrame {
            channels: vec![BilateralSample {
                left: vec![0.0, 0.0],
                right: vec![0.0, 0.0],
            }],
        };
        assert_eq!(
            cfg.check_frame(&frame),
            Err(ConfigError::ChannelCount {
                expected: 2,
                got: 1
            })
        );

        let frame = SensorFrame {
            channels: vec![
                BilateralSample {
                    left: vec![0.0, 0.0, 0.0],
                    right: vec![0.0, 0.0, 0.0],
                },
                BilateralSample {
                    left: vec![0.0, 0.0],
                    right: vec![0.0, 0.0],
                },
            ],
        };
        assert_eq!(
            cfg.check_frame(&frame),
            Err(ConfigError::ReceptorCount {
                channel: 0,
                expected: 2,
                got: 3
            })
        );
    }
}
