//! Mapping pointer clicks to world-space spawn points.
//!
//! A click is converted to normalized device coordinates, turned into a ray
//! from the camera, and intersected with an invisible [`ReferencePlane`].
//! A miss is a normal outcome and simply means nothing spawns.
//!
//! Planes are one-sided by default: only rays travelling against the normal
//! hit, so a camera behind the plane cannot spawn anything. Use
//! [`ReferencePlane::with_double_sided`] to accept hits from both sides.

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

/// Rays closer than this to parallel with the plane are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Rectangular extent of a bounded plane, in plane-local axes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    u_axis: Vec3,
    v_axis: Vec3,
    half_width: f32,
    half_height: f32,
}

/// Invisible plane used only for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePlane {
    center: Vec3,
    normal: Vec3,
    extent: Option<Extent>,
    double_sided: bool,
}

impl ReferencePlane {
    /// Infinite plane through `point`.
    pub fn infinite(point: Vec3, normal: Vec3) -> Self {
        Self {
            center: point,
            normal: normal.try_normalize().unwrap_or(Vec3::Z),
            extent: None,
            double_sided: false,
        }
    }

    /// `width` x `height` rectangle centered on `center`.
    ///
    /// Width runs along the plane's local U axis and height along V. For a
    /// +Z normal these are world X and Y.
    pub fn rectangle(center: Vec3, normal: Vec3, width: f32, height: f32) -> Self {
        let normal = normal.try_normalize().unwrap_or(Vec3::Z);
        let reference_up = if normal.dot(Vec3::Y).abs() > 0.999 { Vec3::Z } else { Vec3::Y };
        let u_axis = reference_up.cross(normal).normalize();
        let v_axis = normal.cross(u_axis);

        Self {
            center,
            normal,
            extent: Some(Extent {
                u_axis,
                v_axis,
                half_width: width.abs() * 0.5,
                half_height: height.abs() * 0.5,
            }),
            double_sided: false,
        }
    }

    /// Accept hits on the back face as well as the front.
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Plane center (or the anchor point of an infinite plane).
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Whether the plane is unbounded.
    pub fn is_infinite(&self) -> bool {
        self.extent.is_none()
    }

    /// Whether back-face hits count.
    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    /// First intersection with `ray`, if any.
    ///
    /// Misses when the ray is parallel to the plane, when the plane is behind
    /// the ray origin, when the hit falls outside a bounded plane, or when a
    /// one-sided plane is approached from behind.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        if denom > 0.0 && !self.double_sided {
            return None;
        }

        let t = self.normal.dot(self.center - ray.origin) / denom;
        if t < 0.0 {
            return None;
        }

        let hit = ray.at(t);
        if let Some(extent) = &self.extent {
            let local = hit - self.center;
            if local.dot(extent.u_axis).abs() > extent.half_width
                || local.dot(extent.v_axis).abs() > extent.half_height
            {
                return None;
            }
        }
        Some(hit)
    }
}

/// Convert a screen position in pixels to normalized device coordinates.
///
/// Screen Y grows downward while device Y grows upward, so Y is flipped.
pub fn screen_to_ndc(screen: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (screen.x / viewport.x) * 2.0 - 1.0,
        -(screen.y / viewport.y) * 2.0 + 1.0,
    )
}

/// Map a click at `screen` pixels to a point on `plane`.
///
/// Returns `None` if the viewport is empty or the click ray misses the plane.
pub fn map_click_to_world(
    screen: Vec2,
    viewport: Vec2,
    camera: &PerspectiveCamera,
    plane: &ReferencePlane,
) -> Option<Vec3> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    let ray = camera.ray_from_ndc(screen_to_ndc(screen, viewport));
    plane.intersect(&ray)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 75.0, 1000.0 / 800.0)
    }

    #[test]
    fn test_screen_to_ndc() {
        let viewport = Vec2::new(1000.0, 800.0);
        assert_eq!(screen_to_ndc(Vec2::new(500.0, 400.0), viewport), Vec2::ZERO);
        assert_eq!(screen_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(viewport, viewport), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_center_click_hits_origin() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, Vec3::Z);
        let hit = map_click_to_world(Vec2::new(500.0, 400.0), Vec2::new(1000.0, 800.0), &camera(), &plane)
            .unwrap();
        assert!(hit.length() < 1e-4, "hit = {hit:?}");
    }

    #[test]
    fn test_edge_click_matches_frustum() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, Vec3::Z);
        // Right edge, vertically centered
        let hit = map_click_to_world(Vec2::new(1000.0, 400.0), Vec2::new(1000.0, 800.0), &camera(), &plane)
            .unwrap();
        let expected_x = 5.0 * (37.5_f32).to_radians().tan() * 1.25;
        assert!((hit.x - expected_x).abs() < 1e-3, "hit = {hit:?}");
        assert!(hit.y.abs() < 1e-4);
        assert!(hit.z.abs() < 1e-4);

        // Top edge maps to positive Y
        let hit = map_click_to_world(Vec2::new(500.0, 0.0), Vec2::new(1000.0, 800.0), &camera(), &plane)
            .unwrap();
        assert!(hit.y > 0.0);
    }

    #[test]
    fn test_bounded_plane_miss() {
        let plane = ReferencePlane::rectangle(Vec3::ZERO, Vec3::Z, 1.0, 1.0);
        let viewport = Vec2::new(1000.0, 800.0);
        assert!(map_click_to_world(Vec2::new(500.0, 400.0), viewport, &camera(), &plane).is_some());
        assert!(map_click_to_world(Vec2::new(0.0, 0.0), viewport, &camera(), &plane).is_none());
    }

    #[test]
    fn test_default_sky_plane_covers_viewport() {
        let plane = ReferencePlane::rectangle(Vec3::ZERO, Vec3::Z, 20.0, 20.0);
        let viewport = Vec2::new(1000.0, 800.0);
        for corner in [Vec2::ZERO, Vec2::new(1000.0, 0.0), Vec2::new(0.0, 800.0), viewport] {
            assert!(map_click_to_world(corner, viewport, &camera(), &plane).is_some());
        }
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(plane.intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_camera_misses() {
        let plane = ReferencePlane::infinite(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        let viewport = Vec2::new(1000.0, 800.0);
        assert!(map_click_to_world(Vec2::new(500.0, 400.0), viewport, &camera(), &plane).is_none());
    }

    #[test]
    fn test_back_side_misses_by_default() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, -Vec3::Z);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(!plane.is_double_sided());
        assert!(plane.intersect(&ray).is_none());

        // Camera behind a plane facing +Z
        let plane = ReferencePlane::rectangle(Vec3::ZERO, Vec3::Z, 20.0, 20.0);
        let behind = PerspectiveCamera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, 75.0, 1.25);
        let viewport = Vec2::new(1000.0, 800.0);
        assert!(map_click_to_world(Vec2::new(500.0, 400.0), viewport, &behind, &plane).is_none());
    }

    #[test]
    fn test_double_sided_hits_back() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, -Vec3::Z).with_double_sided(true);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(plane.intersect(&ray), Some(Vec3::ZERO));
    }

    #[test]
    fn test_empty_viewport() {
        let plane = ReferencePlane::infinite(Vec3::ZERO, Vec3::Z);
        assert!(map_click_to_world(Vec2::ZERO, Vec2::ZERO, &camera(), &plane).is_none());
    }

    #[test]
    fn test_rectangle_axes() {
        let plane = ReferencePlane::rectangle(Vec3::ZERO, Vec3::Z, 4.0, 2.0);
        // 1.9 along X is inside the 4-wide plane, 1.1 along Y is outside the 2-tall one
        let inside = Ray::new(Vec3::new(1.9, 0.0, 1.0), Vec3::NEG_Z);
        let outside = Ray::new(Vec3::new(0.0, 1.1, 1.0), Vec3::NEG_Z);
        assert!(plane.intersect(&inside).is_some());
        assert!(plane.intersect(&outside).is_none());
        assert!(!plane.is_infinite());
    }
}
