//! The render graph emitters draw into.
//!
//! The scene is owned by the host application and handed to emitters by
//! reference. Emitters attach one [`PointCloud`] each at spawn, push new
//! positions and opacity after every step, and detach on expiry. The GPU
//! renderer only ever reads the scene.

use std::collections::BTreeMap;

use glam::Vec3;

/// Handle to a drawable attached to a [`RenderGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(u64);

impl DrawableId {
    /// Create an id from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// A cloud of points sharing one opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    /// One position per point.
    pub positions: Vec<Vec3>,
    /// One RGB color per point, same length as `positions`.
    pub colors: Vec<Vec3>,
    /// Opacity shared by every point. May drop below zero on the last step.
    pub opacity: f32,
    /// Point size in world units.
    pub size: f32,
}

impl PointCloud {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Externally owned collection of drawables.
pub trait RenderGraph {
    /// Add a drawable and return its handle.
    fn attach(&mut self, cloud: PointCloud) -> DrawableId;

    /// Replace a drawable's positions and opacity.
    ///
    /// Unknown ids are ignored.
    fn update(&mut self, id: DrawableId, positions: &[Vec3], opacity: f32);

    /// Remove a drawable, releasing whatever the graph holds for it.
    fn detach(&mut self, id: DrawableId) -> Option<PointCloud>;
}

/// In-memory [`RenderGraph`], iterated in attach order.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: BTreeMap<DrawableId, PointCloud>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached drawables.
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Whether `id` is currently attached.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.drawables.contains_key(&id)
    }

    /// Look up a drawable.
    pub fn get(&self, id: DrawableId) -> Option<&PointCloud> {
        self.drawables.get(&id)
    }

    /// Iterate drawables in attach order.
    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &PointCloud)> {
        self.drawables.iter().map(|(id, cloud)| (*id, cloud))
    }

    /// Total number of points across all drawables.
    pub fn point_count(&self) -> usize {
        self.drawables.values().map(PointCloud::len).sum()
    }
}

impl RenderGraph for Scene {
    fn attach(&mut self, cloud: PointCloud) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.drawables.insert(id, cloud);
        id
    }

    fn update(&mut self, id: DrawableId, positions: &[Vec3], opacity: f32) {
        if let Some(cloud) = self.drawables.get_mut(&id) {
            cloud.positions.clear();
            cloud.positions.extend_from_slice(positions);
            cloud.opacity = opacity;
        }
    }

    fn detach(&mut self, id: DrawableId) -> Option<PointCloud> {
        self.drawables.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(n: usize) -> PointCloud {
        PointCloud {
            positions: vec![Vec3::ZERO; n],
            colors: vec![Vec3::ONE; n],
            opacity: 1.0,
            size: 0.1,
        }
    }

    #[test]
    fn test_attach_assigns_increasing_ids() {
        let mut scene = Scene::new();
        let a = scene.attach(cloud(2));
        let b = scene.attach(cloud(3));
        assert!(a < b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.point_count(), 5);
        let order: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_update_replaces_positions() {
        let mut scene = Scene::new();
        let id = scene.attach(cloud(2));
        scene.update(id, &[Vec3::X, Vec3::Y], 0.5);
        let stored = scene.get(id).unwrap();
        assert_eq!(stored.positions, vec![Vec3::X, Vec3::Y]);
        assert_eq!(stored.opacity, 0.5);
    }

    #[test]
    fn test_detach_removes() {
        let mut scene = Scene::new();
        let id = scene.attach(cloud(1));
        assert!(scene.detach(id).is_some());
        assert!(!scene.contains(id));
        assert!(scene.detach(id).is_none());
        // Updating a detached id is a no-op
        scene.update(id, &[Vec3::X], 0.1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_ids_not_reused() {
        let mut scene = Scene::new();
        let a = scene.attach(cloud(1));
        scene.detach(a);
        let b = scene.attach(cloud(1));
        assert_ne!(a, b);
    }
}
