//! Saturating bias-to-drive mapping.
//!
//! The combined bias is unbounded (normalizing by a small mean can spike
//! it), so it is squashed first:
//!
//! ```text
//! b = tanh(combined^2) * sign(combined)
//! ```
//!
//! `b` stays in `[-1, 1]`, is 0 exactly when the bias is 0, and saturates
//! smoothly for strong asymmetries. The drive mapping then slows one side
//! in proportion to `|b|` while the other holds `delta_max`.

/// Per-side drive signals for the downstream locomotion controller.
///
/// Both values lie in `[delta_min, delta_max]`; the slower side produces
/// the turn, equal values drive straight at full speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationCommand {
    pub left: f64,
    pub right: f64,
}

impl ActuationCommand {
    /// Symmetric full-speed command.
    #[must_use]
    pub const fn straight(delta_max: f64) -> Self {
        Self {
            left: delta_max,
            right: delta_max,
        }
    }
}

/// Squashes an unbounded bias into `[-1, 1]`, preserving sign.
#[must_use]
pub fn saturate(combined: f64) -> f64 {
    if combined == 0.0 {
        // signum(0.0) is 1.0, but tanh(0) already pins the product to 0;
        // returning early keeps -0.0 inputs from leaking a sign bit.
        return 0.0;
    }
    (combined * combined).tanh() * combined.signum()
}

/// Maps a saturated bias to the differential drive command.
///
/// `b > 0` slows the right side, `b < 0` slows the left, `b = 0` drives
/// straight. The reduction is `|b| * (delta_max - delta_min)`, so the
/// command never leaves `[delta_min, delta_max]` on either side.
#[must_use]
pub fn drive_command(b: f64, delta_min: f64, delta_max: f64) -> ActuationCommand {
    debug_assert!(delta_min <= delta_max);
    debug_assert!(b.abs() <= 1.0);
    // The max guards against rounding pushing the slow side one ulp
    // below delta_min at full saturation.
    let slow = (delta_max - b.abs() * (delta_max - delta_min)).max(delta_min);
    if b > 0.0 {
        ActuationCommand {
            left: delta_max,
            right: slow,
        }
    } else {
        ActuationCommand {
            left: slow,
            right: delta_max,
        }
    }
}
