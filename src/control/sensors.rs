//! Bilateral sensor aggregation.
//!
//! Reduces raw per-receptor readings to one normalized steering bias:
//!
//! ```text
//! bias_c  = gain_c * (avg_l - avg_r) / mean(avg_l, avg_r)
//! vision  = gain_v * (b_r - b_l) / (mean(b_l, b_r) + eps)
//! combined = sum(bias_c) + vision
//! ```
//!
//! where `avg_l`/`avg_r` are weighted averages of each side's receptor
//! group. Pure functions of the frame and the immutable configuration; the
//! same frame always yields the same bias.

use crate::config::{ChannelConfig, ControllerConfig};
use crate::params::VISION_EPSILON;

/// Left/right receptor-group readings for one stimulus channel.
///
/// Both groups have the same fixed length, matching the channel's weight
/// vector in the configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BilateralSample {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
}

/// One embodiment observation of every configured stimulus channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorFrame {
    pub channels: Vec<BilateralSample>,
}

impl SensorFrame {
    /// Mean over every receptor of every channel. Used by the degenerate
    /// gradient-climbing strategy, which has no bilateral split.
    #[must_use]
    pub fn mean_intensity(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for sample in &self.channels {
            sum += sample.left.iter().sum::<f64>() + sample.right.iter().sum::<f64>();
            count += sample.left.len() + sample.right.len();
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

/// Per-eye mean brightness, derived externally from the raw retina images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionFrame {
    pub left_brightness: f64,
    pub right_brightness: f64,
}

/// Weighted average: `sum(v_i * w_i) / sum(w_i)`.
///
/// The caller guarantees equal lengths and a nonzero weight sum; both are
/// enforced at configuration time.
#[must_use]
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(values.len(), weights.len());
    let weight_sum: f64 = weights.iter().sum();
    debug_assert!(weight_sum != 0.0);
    let dot: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    dot / weight_sum
}

/// Normalized asymmetry of one channel.
///
/// A left/right mean of exactly zero yields 0 for this tick instead of a
/// NaN that would poison the combined bias.
#[must_use]
pub fn channel_bias(sample: &BilateralSample, channel: &ChannelConfig) -> f64 {
    let avg_l = weighted_average(&sample.left, &channel.weights);
    let avg_r = weighted_average(&sample.right, &channel.weights);
    let mean = f64::midpoint(avg_l, avg_r);
    if mean == 0.0 {
        return 0.0;
    }
    channel.gain * (avg_l - avg_r) / mean
}

/// Normalized bilateral brightness difference, stabilized against a dark
/// field by `VISION_EPSILON`.
#[must_use]
pub fn vision_bias(frame: &VisionFrame, gain: f64) -> f64 {
    let mean = f64::midpoint(frame.left_brightness, frame.right_brightness);
    let diff = (frame.right_brightness - frame.left_brightness) / (mean + VISION_EPSILON);
    gain * diff
}

/// Combines every channel asymmetry and the optional vision term into the
/// single steering bias consumed by the actuation mapper.
#[must_use]
pub fn combined_bias(
    frame: &SensorFrame,
    vision: Option<&VisionFrame>,
    config: &ControllerConfig,
) -> f64 {
    let odor: f64 = frame
        .channels
        .iter()
        .zip(&config.channels)
        .map(|(sample, channel)| channel_bias(sample, channel))
        .sum();

    match (vision, config.vision_gain) {
        (Some(frame), Some(gain)) => odor + vision_bias(frame, gain),
        _ => odor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;

    fn channel(gain: f64, weights: &[f64]) -> ChannelConfig {
        ChannelConfig {
            gain,
            weights: weights.to_vec(),
        }
    }

    #[test]
    fn test_weighted_average() {
        assert!((weighted_average(&[1.0, 0.0], &[9.0, 1.0]) - 0.9).abs() < 1e-12);
        assert!((weighted_average(&[0.5, 0.5], &[10.0, 0.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_readings_give_zero_bias() {
        let sample = BilateralSample {
            left: vec![0.3, 0.7],
            right: vec![0.3, 0.7],
        };
        let bias = channel_bias(&sample, &channel(-500.0, &[9.0, 1.0]));
        assert_eq!(bias, 0.0);
    }

    #[test]
    fn test_zero_mean_yields_zero_not_nan() {
        let sample = BilateralSample {
            left: vec![0.0, 0.0],
            right: vec![0.0, 0.0],
        };
        let bias = channel_bias(&sample, &channel(-500.0, &[9.0, 1.0]));
        assert_eq!(bias, 0.0);
        assert!(bias.is_finite());
    }

    #[test]
    fn test_scenario_weights_nine_one() {
        // weights [9,1], left [1,0], right [0,0], gain -500:
        // avg_l = 0.9, avg_r = 0.0, mean = 0.45, bias = -500 * 0.9 / 0.45.
        let sample = BilateralSample {
            left: vec![1.0, 0.0],
            right: vec![0.0, 0.0],
        };
        let bias = channel_bias(&sample, &channel(-500.0, &[9.0, 1.0]));
        assert!((bias - (-1000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_left_weight_monotonicity() {
        // With avg_l > avg_r, growing the first left-heavy weight must not
        // shrink the asymmetry magnitude.
        let sample = BilateralSample {
            left: vec![1.0, 0.2],
            right: vec![0.1, 0.2],
        };
        let mut previous = 0.0f64;
        for w in [1.0, 3.0, 9.0, 27.0] {
            let bias = channel_bias(&sample, &channel(-500.0, &[w, 1.0])).abs();
            assert!(
                bias >= previous,
                "bias magnitude {bias} dropped below {previous} at weight {w}"
            );
            previous = bias;
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let config = ControllerConfig::default();
        let frame = SensorFrame {
            channels: vec![
                BilateralSample {
                    left: vec![0.4, 0.1],
                    right: vec![0.2, 0.3],
                },
                BilateralSample {
                    left: vec![0.0, 0.5],
                    right: vec![0.6, 0.0],
                },
            ],
        };
        let first = combined_bias(&frame, None, &config);
        let second = combined_bias(&frame, None, &config);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_vision_bias_dark_field_is_stable() {
        let frame = VisionFrame {
            left_brightness: 0.0,
            right_brightness: 0.0,
        };
        let bias = vision_bias(&frame, 200.0);
        assert_eq!(bias, 0.0);
        assert!(bias.is_finite());
    }

    #[test]
    fn test_vision_bias_sign_follows_brighter_side() {
        let frame = VisionFrame {
            left_brightness: 0.2,
            right_brightness: 0.8,
        };
        assert!(vision_bias(&frame, 200.0) > 0.0);

        let frame = VisionFrame {
            left_brightness: 0.8,
            right_brightness: 0.2,
        };
        assert!(vision_bias(&frame, 200.0) < 0.0);
    }

    #[test]
    fn test_combined_bias_ignores_vision_without_gain() {
        let mut config = ControllerConfig::default();
        config.vision_gain = None;
        let frame = SensorFrame {
            channels: vec![
                BilateralSample {
                    left: vec![1.0, 0.0],
                    right: vec![0.0, 0.0],
                },
                BilateralSample {
                    left: vec![0.0, 0.0],
                    right: vec![0.0, 0.0],
                },
            ],
        };
        let vision = VisionFrame {
            left_brightness: 0.1,
            right_brightness: 0.9,
        };
        let without = combined_bias(&frame, None, &config);
        let with = combined_bias(&frame, Some(&vision), &config);
        assert_eq!(without, with);

        config.vision_gain = Some(200.0);
        let enabled = combined_bias(&frame, Some(&vision), &config);
        assert!(enabled > without);
    }

    #[test]
    fn test_mean_intensity() {
        let frame = SensorFrame {
            channels: vec![BilateralSample {
                left: vec![0.2, 0.4],
                right: vec![0.6, 0.8],
            }],
        };
        assert!((frame.mean_intensity() - 0.5).abs() < 1e-12);
        assert_eq!(SensorFrame::default().mean_intensity(), 0.0);
    }
}
