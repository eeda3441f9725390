//! Perspective camera for viewing and picking.

use glam::{Mat4, Vec2, Vec3};

use crate::picking::Ray;

/// Fixed perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Camera world position.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl PerspectiveCamera {
    /// Camera at `position` looking at `target`, with Y up.
    pub fn new(position: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Update the aspect ratio after a resize. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Perspective projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined projection * view.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector pointing forward, from the camera toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    /// Unit vector pointing to the right of the view.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).try_normalize().unwrap_or(Vec3::X)
    }

    /// Unit vector pointing up in view space, orthogonal to forward and right.
    pub fn up_vector(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Ray from the camera through a point in normalized device coordinates.
    ///
    /// `ndc` ranges over `[-1, 1]` on both axes with Y pointing up.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let far = far.truncate() / far.w;
        Ray::new(self.position, far - self.position)
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 75.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_for_default_camera() {
        let camera = PerspectiveCamera::default();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
        assert!((camera.up_vector() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = PerspectiveCamera::new(Vec3::new(3.0, 2.0, 4.0), Vec3::new(0.0, 1.0, 0.0), 60.0, 1.5);
        let ray = camera.ray_from_ndc(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - camera.forward()).length() < 1e-4);
    }

    #[test]
    fn test_set_viewport() {
        let mut camera = PerspectiveCamera::default();
        camera.set_viewport(1000, 800);
        assert_eq!(camera.aspect, 1.25);
        camera.set_viewport(0, 800);
        assert_eq!(camera.aspect, 1.25);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let camera = PerspectiveCamera::default();
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
