#![warn(missing_docs)]
//! Perspective camera and orbit controls for the scene viewer.

mod orbit;

pub use orbit::{OrbitControls, Spherical};

use glam::{Mat4, Vec2, Vec3};
use sceneview_core::Ray;

/// Perspective camera looking from `position` at `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction used to build the view basis.
    pub up: Vec3,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(4.0, 10.0, 11.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    /// Unit vector from the camera toward its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio (call when the window resizes).
    ///
    /// Zero-sized viewports (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// World-space ray from the camera through a point in normalized device
    /// coordinates (`[-1, 1]` on both axes, +Y up).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        // wgpu clip space has z in [0, 1]; unproject a point halfway in.
        let point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, point - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_default_initialization() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(4.0, 10.0, 11.0));
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
        assert!((camera.fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let ray = camera.ray_through(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn corner_ray_follows_frustum_edge() {
        let mut camera = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        camera.set_viewport(100, 100);
        let ray = camera.ray_through(Vec2::new(1.0, 1.0));

        // With a square viewport the corner ray leaves at fov/2 on both axes.
        let half = (camera.fov * 0.5).tan();
        let expected = Vec3::new(half, half, -1.0).normalize();
        assert!((ray.direction - expected).length() < 1e-4);
    }

    #[test]
    fn zero_viewport_keeps_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(800, 400);
        camera.set_viewport(0, 600);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn camera_matrices_are_valid() {
        let camera = Camera::default();

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = camera.view_projection_matrix();

        assert!(view.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(proj.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(view_proj.to_cols_array().iter().all(|x| x.is_finite()));

        // The target projects to the center of the screen.
        let center = view_proj.project_point3(camera.target);
        assert!(center.x.abs() < 1e-5 && center.y.abs() < 1e-5);
    }
}
