//! # Fireworks
//!
//! Click-to-spawn particle explosions rendered with wgpu.
//!
//! Each left click is projected through a perspective camera onto an
//! invisible reference plane. Where it lands, an explosion of a few hundred
//! particles bursts outward in a random hue, falls under gravity, slows under
//! drag and fades out over about a second.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fireworks::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     fireworks::app::run(AppConfig::load())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Headless use
//!
//! The simulation does not need a window. Drive a [`FrameDriver`] with any
//! [`FrameHost`] and inspect the [`Scene`] it maintains:
//!
//! ```ignore
//! use fireworks::prelude::*;
//!
//! let mut driver = FrameDriver::new(
//!     FireworkConfig::default(),
//!     Scene::new(),
//!     RandomSampler::seeded(7),
//!     PerspectiveCamera::default(),
//!     ReferencePlane::rectangle(Vec3::ZERO, Vec3::Z, 20.0, 20.0),
//! );
//!
//! driver.handle_click(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0));
//! driver.tick(&mut my_host)?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Emitters
//!
//! A [`ParticleEmitter`] is one explosion. It advances by a fixed step per
//! frame and expires once its opacity reaches zero, 67 steps with the
//! default fade rate.
//!
//! ### Registry
//!
//! The [`EmitterRegistry`] owns every live emitter, steps them all each frame
//! and disposes of expired ones exactly once.
//!
//! ### Render graph
//!
//! Emitters publish their particles through the [`RenderGraph`] trait.
//! [`Scene`] is the in-memory implementation the GPU renderer draws from.
//!
//! ## Configuration
//!
//! Settings are read from `fireworks.toml` in the working directory, or the
//! file named by `FIREWORKS_CONFIG`. See [`AppConfig`].

pub mod app;
pub mod camera;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod gpu;
pub mod input;
pub mod picking;
pub mod registry;
pub mod scene;
pub mod spawn;
pub mod time;

pub use camera::PerspectiveCamera;
pub use config::{AppConfig, BlendMode, FireworkConfig};
pub use driver::{FrameDriver, FrameHost};
pub use emitter::ParticleEmitter;
pub use error::{AppError, ConfigError, GpuError};
pub use glam::{Vec2, Vec3};
pub use picking::{map_click_to_world, Ray, ReferencePlane};
pub use registry::EmitterRegistry;
pub use scene::{DrawableId, PointCloud, RenderGraph, Scene};
pub use spawn::{hsl_to_rgb, RandomSampler, Sampler};

/// Common imports.
pub mod prelude {
    pub use crate::camera::PerspectiveCamera;
    pub use crate::config::{AppConfig, BlendMode, FireworkConfig};
    pub use crate::driver::{FrameDriver, FrameHost};
    pub use crate::emitter::ParticleEmitter;
    pub use crate::input::{Click, Input, MouseButton};
    pub use crate::picking::{map_click_to_world, ReferencePlane};
    pub use crate::registry::EmitterRegistry;
    pub use crate::scene::{PointCloud, RenderGraph, Scene};
    pub use crate::spawn::{RandomSampler, Sampler};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3};
}
