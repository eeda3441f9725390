//! A single firework explosion.
//!
//! An emitter owns a fixed buffer of particles that all start at the spawn
//! point and fly outward in uniformly random directions. Every step applies,
//! in this order:
//!
//! 1. `position += velocity` (explicit Euler, one frame per step)
//! 2. `velocity.y -= gravity`
//! 3. `velocity *= drag`
//!
//! and then lowers the shared opacity by `fade_rate`. The emitter is live
//! while its opacity is above zero.
//!
//! # Example
//!
//! ```ignore
//! let config = FireworkConfig::default();
//! let mut sampler = RandomSampler::from_entropy();
//! let mut emitter = ParticleEmitter::new(Vec3::ZERO, &config, &mut sampler);
//!
//! while !emitter.is_expired() {
//!     emitter.step();
//! }
//! assert_eq!(emitter.age(), config.lifetime_steps());
//! ```

use glam::Vec3;

use crate::config::FireworkConfig;
use crate::scene::{DrawableId, PointCloud, RenderGraph};
use crate::spawn::{hsl_to_rgb, Sampler};

/// Per-step physics constants copied out of [`FireworkConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Physics {
    gravity: f32,
    drag: f32,
    fade_rate: f32,
}

/// One explosion: positions, velocities and a shared fading opacity.
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    base_color: Vec3,
    opacity: f32,
    point_size: f32,
    physics: Physics,
    age: u32,
    drawable: Option<DrawableId>,
}

impl ParticleEmitter {
    /// Build an emitter at `spawn` without attaching it to a render graph.
    ///
    /// Draws one direction and one speed per particle, then one hue for
    /// the whole explosion.
    pub fn new<S: Sampler + ?Sized>(spawn: Vec3, config: &FireworkConfig, sampler: &mut S) -> Self {
        let count = config.particle_count as usize;

        let velocities: Vec<Vec3> = (0..count)
            .map(|_| {
                let direction = sampler.direction();
                let speed = sampler.speed(config.min_speed, config.max_speed);
                direction * speed
            })
            .collect();

        let base_color = hsl_to_rgb(sampler.hue(), config.saturation, config.lightness);

        Self {
            positions: vec![spawn; count],
            velocities,
            base_color,
            opacity: config.initial_opacity,
            point_size: config.point_size,
            physics: Physics {
                gravity: config.gravity,
                drag: config.drag,
                fade_rate: config.fade_rate,
            },
            age: 0,
            drawable: None,
        }
    }

    /// Build an emitter and attach its point cloud to `graph`.
    pub fn create<S, G>(spawn: Vec3, config: &FireworkConfig, sampler: &mut S, graph: &mut G) -> Self
    where
        S: Sampler + ?Sized,
        G: RenderGraph + ?Sized,
    {
        let mut emitter = Self::new(spawn, config, sampler);
        emitter.drawable = Some(graph.attach(emitter.point_cloud()));
        emitter
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self) {
        let Physics { gravity, drag, fade_rate } = self.physics;

        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *position += *velocity;
            velocity.y -= gravity;
            *velocity *= drag;
        }

        self.opacity -= fade_rate;
        self.age += 1;
    }

    /// Whether the explosion has fully faded.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.opacity <= 0.0
    }

    /// Push current positions and opacity to the render graph.
    pub fn sync<G: RenderGraph + ?Sized>(&self, graph: &mut G) {
        if let Some(id) = self.drawable {
            graph.update(id, &self.positions, self.opacity);
        }
    }

    /// Detach from the render graph and drop all particle data.
    pub fn dispose<G: RenderGraph + ?Sized>(self, graph: &mut G) {
        if let Some(id) = self.drawable {
            graph.detach(id);
        }
    }

    /// Number of particles. Never changes after construction.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Particle positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Particle velocities, index-aligned with [`positions`](Self::positions).
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Color shared by every particle.
    pub fn base_color(&self) -> Vec3 {
        self.base_color
    }

    /// Per-particle color buffer as handed to the renderer.
    pub fn colors(&self) -> Vec<Vec3> {
        vec![self.base_color; self.particle_count()]
    }

    /// Current opacity. Drops by `fade_rate` every step and may end slightly below zero.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Steps taken since spawn.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Render graph handle, if attached.
    pub fn drawable(&self) -> Option<DrawableId> {
        self.drawable
    }

    fn point_cloud(&self) -> PointCloud {
        PointCloud {
            positions: self.positions.clone(),
            colors: self.colors(),
            opacity: self.opacity,
            size: self.point_size,
        }
    }
}
