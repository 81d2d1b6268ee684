//! Stimulus arena: point odor sources and dark obstacles on an open plane.
//!
//! Each source carries one peak intensity per configured channel and
//! diffuses with the inverse square of distance. Obstacles only matter to
//! the vision field: they darken whichever eye faces them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Distance floor so a receptor sitting on a source cannot blow up the
/// inverse-square term.
const MIN_DIFFUSION_DIST: f64 = 0.5;

/// One point stimulus source with a peak intensity per channel.
#[derive(Debug, Clone)]
pub struct OdorSource {
    pub position: [f64; 3],
    /// Peak intensity of this source in each channel, in channel order.
    pub peaks: Vec<f64>,
}

/// A dark cylinder that occludes the brightness field.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub position: [f64; 2],
    pub radius: f64,
}

/// The world the walker samples: sources, obstacles, optional sensor noise.
#[derive(Debug)]
pub struct Arena {
    sources: Vec<OdorSource>,
    obstacles: Vec<Obstacle>,
    channels: usize,
    noise: Option<(f64, SmallRng)>,
}

impl Arena {
    /// Builds an arena; `channels` fixes the length every source's peak
    /// vector is read at (missing entries count as 0).
    #[must_use]
    pub fn new(sources: Vec<OdorSource>, obstacles: Vec<Obstacle>, channels: usize) -> Self {
        Self {
            sources,
            obstacles,
            channels,
            noise: None,
        }
    }

    /// Adds uniform `[-magnitude, magnitude]` receptor noise from a seeded
    /// generator.
    #[must_use]
    pub fn with_noise(mut self, magnitude: f64, seed: u64) -> Self {
        self.noise = Some((magnitude, SmallRng::seed_from_u64(seed)));
        self
    }

    /// Two attractive sources flanked by a field of aversive ones, the
    /// standard two-channel demo layout.
    #[must_use]
    pub fn demo() -> Self {
        let attractive = [[24.0, 6.0, 1.5], [24.0, -6.0, 1.5]];
        let aversive = [
            [24.0, 0.0, 1.5],
            [8.0, 4.0, 1.5],
            [16.0, 4.0, 1.5],
            [16.0, -4.0, 1.5],
            [8.0, -4.0, 1.5],
        ];
        let mut sources = Vec::new();
        for position in attractive {
            sources.push(OdorSource {
                position,
                peaks: vec![1.0, 0.0],
            });
        }
        for position in aversive {
            sources.push(OdorSource {
                position,
                peaks: vec![0.0, 1.0],
            });
        }
        Self::new(sources, Vec::new(), 2)
    }

    /// Single attractive source behind a row of dark obstacles, the
    /// odor-plus-vision demo layout.
    #[must_use]
    pub fn demo_with_obstacles() -> Self {
        let sources = vec![OdorSource {
            position: [20.0, 0.0, 1.5],
            peaks: vec![1.0],
        }];
        let obstacles = [-2.0, 0.0, 2.0, 4.0]
            .into_iter()
            .map(|y| Obstacle {
                position: [10.0, y],
                radius: 1.0,
            })
            .collect();
        Self::new(sources, obstacles, 1)
    }

    #[must_use]
    pub const fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn attractive_targets(&self) -> Vec<[f64; 2]> {
        self.sources
            .iter()
            .filter(|source| source.peaks.first().copied().unwrap_or(0.0) > 0.0)
            .map(|source| [source.position[0], source.position[1]])
            .collect()
    }

    /// Stimulus intensity of one channel at a point in space.
    pub fn intensity(&mut self, channel: usize, point: [f64; 3]) -> f64 {
        let mut total = 0.0;
        for source in &self.sources {
            let peak = source.peaks.get(channel).copied().unwrap_or(0.0);
            if peak == 0.0 {
                continue;
            }
            let dx = point[0] - source.position[0];
            let dy = point[1] - source.position[1];
            let dz = point[2] - source.position[2];
            let dist = (dx * dx + dy * dy + dz * dz).sqrt().max(MIN_DIFFUSION_DIST);
            total += peak / (dist * dist);
        }
        if let Some((magnitude, rng)) = &mut self.noise {
            total += rng.random_range(-*magnitude..*magnitude);
        }
        total.max(0.0)
    }

    /// Brightness seen by an eye at `point` looking along `heading`.
    ///
    /// Starts from a unit ambient field; every obstacle on the eye's side
    /// of the heading darkens it by `radius^2 / dist^2`.
    #[must_use]
    pub fn brightness(&self, point: [f64; 2], heading: f64, left_eye: bool) -> f64 {
        let (sin_h, cos_h) = heading.sin_cos();
        let mut darkness = 0.0;
        for obstacle in &self.obstacles {
            let dx = obstacle.position[0] - point[0];
            let dy = obstacle.position[1] - point[1];
            // Cross product sign picks the side of the heading the
            // obstacle lies on; positive is the left half-field.
            let side = cos_h * dy - sin_h * dx;
            if (side > 0.0) != left_eye {
                continue;
            }
            let dist_sq = (dx * dx + dy * dy).max(MIN_DIFFUSION_DIST);
            darkness += obstacle.radius * obstacle.radius / dist_sq;
        }
        (1.0 - darkness).clamp(0.0, 1.0)
    }
}
