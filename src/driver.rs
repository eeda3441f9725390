//! Per-frame driver tying input, simulation and rendering together.
//!
//! The host calls [`FrameDriver::tick`] once per display refresh and
//! [`FrameDriver::handle_click`] from its input handler. Both run on the same
//! thread, so a click is always handled between two complete ticks.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::camera::PerspectiveCamera;
use crate::config::FireworkConfig;
use crate::picking::{map_click_to_world, ReferencePlane};
use crate::registry::EmitterRegistry;
use crate::scene::RenderGraph;
use crate::spawn::Sampler;
use crate::time::FrameClock;

/// The rendering side of the frame loop.
pub trait FrameHost<G: ?Sized> {
    /// Error returned by a failed render.
    type Error;

    /// Draw the current contents of `graph` from `camera`.
    fn render(&mut self, graph: &G, camera: &PerspectiveCamera) -> Result<(), Self::Error>;

    /// Ask to be ticked again on the next display refresh.
    fn request_next_frame(&mut self);
}

/// Owns the emitter registry, the render graph and the picking setup.
#[derive(Debug)]
pub struct FrameDriver<G, S> {
    registry: EmitterRegistry,
    graph: G,
    sampler: S,
    camera: PerspectiveCamera,
    plane: ReferencePlane,
    clock: FrameClock,
}

impl<G: RenderGraph, S: Sampler> FrameDriver<G, S> {
    /// Create a driver with no live explosions.
    pub fn new(
        config: FireworkConfig,
        graph: G,
        sampler: S,
        camera: PerspectiveCamera,
        plane: ReferencePlane,
    ) -> Self {
        Self {
            registry: EmitterRegistry::new(config),
            graph,
            sampler,
            camera,
            plane,
            clock: FrameClock::new(),
        }
    }

    /// Run one frame: advance every explosion, render, then schedule the next frame.
    ///
    /// The next frame is requested even if rendering fails, so a transient
    /// surface error does not stop the loop.
    pub fn tick<H: FrameHost<G>>(&mut self, host: &mut H) -> Result<(), H::Error> {
        self.registry.advance_all(&mut self.graph);

        let rendered = host.render(&self.graph, &self.camera);
        host.request_next_frame();

        if self.clock.tick() {
            debug!(
                fps = self.clock.fps(),
                frame = self.clock.frame(),
                live = self.registry.len(),
                "Frame stats"
            );
        }
        rendered
    }

    /// Spawn an explosion where a click at `screen` lands on the reference plane.
    ///
    /// Returns the spawn point, or `None` if the click missed and nothing spawned.
    pub fn handle_click(&mut self, screen: Vec2, viewport: Vec2) -> Option<Vec3> {
        let Some(point) = map_click_to_world(screen, viewport, &self.camera, &self.plane) else {
            debug!(x = screen.x, y = screen.y, "Click missed the reference plane");
            return None;
        };
        self.registry.spawn(point, &mut self.sampler, &mut self.graph);
        Some(point)
    }

    /// Track a window resize. Zero-sized windows are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Dispose of every live explosion.
    pub fn shutdown(&mut self) {
        self.registry.clear(&mut self.graph);
    }

    /// The emitter registry.
    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    /// The render graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// The camera used for rendering and picking.
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// The picking plane.
    pub fn plane(&self) -> &ReferencePlane {
        &self.plane
    }
}
