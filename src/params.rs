//! Default controller and simulation hyperparameters.

/// Gain applied to the attractive odor channel. Negative: the mapping in
/// `control::actuation` slows the side opposite the stronger reading, so a
/// negative gain steers toward the source.
pub const ATTRACTIVE_GAIN: f64 = -500.0;
/// Gain applied to the aversive odor channel.
pub const AVERSIVE_GAIN: f64 = 80.0;
/// Gain applied to the bilateral brightness difference.
pub const VISION_GAIN: f64 = 200.0;

/// Receptor weights for the attractive channel (antenna, palp).
pub const ATTRACTIVE_WEIGHTS: [f64; 2] = [9.0, 1.0];
/// Receptor weights for the aversive channel.
pub const AVERSIVE_WEIGHTS: [f64; 2] = [10.0, 0.0];

/// Lower bound of the per-side drive signal.
pub const DELTA_MIN: f64 = 0.2;
/// Upper bound of the per-side drive signal (straight, full speed).
pub const DELTA_MAX: f64 = 1.0;

/// Seconds between control decisions.
pub const DECISION_INTERVAL: f64 = 0.05;
/// Seconds per physics substep.
pub const PHYSICS_TIMESTEP: f64 = 1e-4;
/// Total simulated seconds per run.
pub const TOTAL_TIME: f64 = 5.0;
/// Planar distance to a target that counts as arrival.
pub const TERMINATION_RADIUS: f64 = 2.0;

/// Stabilizer added to the brightness mean before dividing.
pub const VISION_EPSILON: f64 = 1e-6;

/// Angular offset of the receptor masts from the heading (radians).
pub const SENSOR_ANGLE: f64 = 0.5;
/// Distance of the forward receptor rank from the body center.
pub const ANTENNA_DIST: f64 = 2.0;
/// Distance of the rear receptor rank from the body center.
pub const PALP_DIST: f64 = 1.0;

/// Forward speed of the walker at full symmetric drive.
pub const WALKER_SPEED: f64 = 8.0;
/// Yaw rate per unit of drive asymmetry (radians per second).
pub const WALKER_TURN_GAIN: f64 = 12.0;

/// Speed floor for the gradient-climbing variant.
pub const CLIMBER_SPEED_FLOOR: f64 = 0.25;
/// Magnitude of sensor noise added by the arena when enabled.
pub const SENSOR_NOISE: f64 = 0.01;
