//! The set of live explosions.
//!
//! The registry exclusively owns every emitter from spawn until disposal.
//! Each frame it steps all emitters, then sweeps out the expired ones in a
//! single ordered pass so nothing is skipped or processed twice.

use glam::Vec3;
use tracing::debug;

use crate::config::FireworkConfig;
use crate::emitter::ParticleEmitter;
use crate::scene::RenderGraph;
use crate::spawn::Sampler;

/// Insertion-ordered collection of live emitters.
#[derive(Debug, Default)]
pub struct EmitterRegistry {
    emitters: Vec<ParticleEmitter>,
    config: FireworkConfig,
    total_spawned: u64,
    total_expired: u64,
}

impl EmitterRegistry {
    /// Create an empty registry that spawns explosions with `config`.
    pub fn new(config: FireworkConfig) -> Self {
        Self {
            emitters: Vec::new(),
            config,
            total_spawned: 0,
            total_expired: 0,
        }
    }

    /// Settings used for new explosions.
    pub fn config(&self) -> &FireworkConfig {
        &self.config
    }

    /// Start a new explosion at `point`.
    ///
    /// There is no cap on concurrent explosions.
    pub fn spawn<S, G>(&mut self, point: Vec3, sampler: &mut S, graph: &mut G) -> &ParticleEmitter
    where
        S: Sampler + ?Sized,
        G: RenderGraph + ?Sized,
    {
        let emitter = ParticleEmitter::create(point, &self.config, sampler, graph);
        self.total_spawned += 1;
        debug!(
            x = point.x,
            y = point.y,
            z = point.z,
            live = self.emitters.len() + 1,
            "Spawned firework"
        );
        self.emitters.push(emitter);
        &self.emitters[self.emitters.len() - 1]
    }

    /// Step every live emitter once, then dispose of the ones that expired.
    ///
    /// Returns the number of emitters removed.
    pub fn advance_all<G: RenderGraph + ?Sized>(&mut self, graph: &mut G) -> usize {
        for emitter in &mut self.emitters {
            emitter.step();
        }

        let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.emitters)
            .into_iter()
            .partition(ParticleEmitter::is_expired);
        self.emitters = live;

        let removed = expired.len();
        for emitter in expired {
            emitter.dispose(graph);
        }
        for emitter in &self.emitters {
            emitter.sync(graph);
        }

        if removed > 0 {
            self.total_expired += removed as u64;
            debug!(removed, live = self.emitters.len(), "Fireworks expired");
        }
        removed
    }

    /// Dispose of every live emitter.
    pub fn clear<G: RenderGraph + ?Sized>(&mut self, graph: &mut G) {
        for emitter in self.emitters.drain(..) {
            emitter.dispose(graph);
        }
    }

    /// Number of live emitters.
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    /// Whether there are no live emitters.
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Iterate live emitters, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ParticleEmitter> {
        self.emitters.iter()
    }

    /// Explosions spawned since creation.
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    /// Explosions that have expired since creation.
    pub fn total_expired(&self) -> u64 {
        self.total_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::spawn::RandomSampler;

    fn registry() -> EmitterRegistry {
        EmitterRegistry::new(FireworkConfig::default().with_particle_count(8))
    }

    #[test]
    fn test_spawn_adds_and_attaches() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(1);

        let id = registry.spawn(Vec3::X, &mut sampler, &mut scene).drawable();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.total_spawned(), 1);
        assert!(scene.contains(id.unwrap()));
    }

    #[test]
    fn test_advance_syncs_scene() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(2);
        registry.spawn(Vec3::ZERO, &mut sampler, &mut scene);

        assert_eq!(registry.advance_all(&mut scene), 0);

        let emitter = registry.iter().next().unwrap();
        let cloud = scene.get(emitter.drawable().unwrap()).unwrap();
        assert_eq!(cloud.positions, emitter.positions());
        assert_eq!(cloud.opacity, emitter.opacity());
    }

    #[test]
    fn test_removes_after_lifetime() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(3);
        registry.spawn(Vec3::ZERO, &mut sampler, &mut scene);

        for _ in 0..66 {
            assert_eq!(registry.advance_all(&mut scene), 0);
        }
        assert_eq!(registry.advance_all(&mut scene), 1);
        assert!(registry.is_empty());
        assert!(scene.is_empty());
        assert_eq!(registry.total_expired(), 1);
    }

    #[test]
    fn test_simultaneous_expiry_removes_all() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(4);
        for i in 0..5 {
            registry.spawn(Vec3::splat(i as f32), &mut sampler, &mut scene);
        }

        let removed: usize = (0..67).map(|_| registry.advance_all(&mut scene)).sum();
        assert_eq!(removed, 5);
        assert!(registry.is_empty());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_sweep_keeps_survivor_order() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(6);
        for i in 0..50 {
            registry.spawn(Vec3::splat(i as f32), &mut sampler, &mut scene);
        }
        for _ in 0..10 {
            registry.advance_all(&mut scene);
        }
        for i in 0..50 {
            registry.spawn(Vec3::splat(-(i as f32)), &mut sampler, &mut scene);
        }

        for _ in 0..56 {
            assert_eq!(registry.advance_all(&mut scene), 0);
        }
        assert_eq!(registry.advance_all(&mut scene), 50);
        assert_eq!(registry.len(), 50);
        assert_eq!(scene.len(), 50);

        let ids: Vec<_> = registry.iter().filter_map(|e| e.drawable()).collect();
        assert_eq!(ids.len(), 50);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| scene.contains(*id)));
        assert!(registry.iter().all(|e| e.age() == 57));
    }

    #[test]
    fn test_clear_disposes_everything() {
        let mut registry = registry();
        let mut scene = Scene::new();
        let mut sampler = RandomSampler::seeded(5);
        registry.spawn(Vec3::ZERO, &mut sampler, &mut scene);
        registry.spawn(Vec3::ONE, &mut sampler, &mut scene);

        registry.clear(&mut scene);
        assert!(registry.is_empty());
        assert!(scene.is_empty());
    }
}
