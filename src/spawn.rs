//! Random sampling for explosion spawns.
//!
//! Every random draw an emitter makes at construction goes through the
//! [`Sampler`] trait, so tests can substitute fixed values (for example a
//! zero burst speed) without touching the simulation code.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the random values used when spawning an explosion.
///
/// Only [`unit`](Sampler::unit) is required; the other methods derive
/// from it and can be overridden individually.
pub trait Sampler {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniformly distributed unit vector.
    ///
    /// Uses `theta = 2π·u` and `phi = acos(2v − 1)`, which keeps the
    /// distribution uniform over the sphere rather than clustering at the poles.
    fn direction(&mut self) -> Vec3 {
        let u = self.unit();
        let v = self.unit();
        let theta = TAU * u;
        let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
        Vec3::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    }

    /// Burst speed in `[min, max)`.
    fn speed(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }

    /// Hue in `[0, 1)`.
    fn hue(&mut self) -> f32 {
        self.unit()
    }
}

/// [`Sampler`] backed by a small fast PRNG.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: SmallRng,
}

impl RandomSampler {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic sampler for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Sampler for RandomSampler {
    #[inline]
    fn unit(&mut self) -> f32 {
        self.rng.gen()
    }
}

/// Convert HSL to RGB.
///
/// * `h` - hue, wraps modulo 1 (0 = red, 1/3 = green, 2/3 = blue)
/// * `s` - saturation, 0 (gray) to 1 (vivid)
/// * `l` - lightness, 0 (black) to 1 (white); 0.5 gives the purest color
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let low = 2.0 * l - high;

    Vec3::new(
        hue_channel(low, high, h + 1.0 / 3.0),
        hue_channel(low, high, h),
        hue_channel(low, high, h - 1.0 / 3.0),
    )
}

fn hue_channel(low: f32, high: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}
