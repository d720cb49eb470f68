//! Orbit controls: drag to rotate around a target, wheel to dolly, and
//! secondary drag to pan, with optional damping.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::Camera;

const EPS: f32 = 1e-6;
/// Closest the camera may get to the target, whatever `min_distance` says.
const MIN_RADIUS: f32 = 1e-3;

/// Spherical coordinates around the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Polar angle from +Y, in radians.
    pub phi: f32,
    /// Azimuth around +Y measured from +Z, in radians.
    pub theta: f32,
}

impl Spherical {
    /// Convert a cartesian offset.
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    /// Convert back to a cartesian offset.
    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit camera controller.
///
/// Input methods only queue deltas; [`OrbitControls::update`] applies them
/// to a camera once per frame.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Ease deltas out over several frames.
    pub enable_damping: bool,
    /// Fraction of the queued delta applied per frame when damping.
    pub damping_factor: f32,
    /// Allow panning.
    pub enable_pan: bool,
    /// Minimum camera distance from the target.
    pub min_distance: f32,
    /// Maximum camera distance from the target.
    pub max_distance: f32,
    /// Lowest polar angle (closest to looking straight down).
    pub min_polar_angle: f32,
    /// Highest polar angle (closest to the horizon and below).
    pub max_polar_angle: f32,
    /// Spin around the target when idle.
    pub auto_rotate: bool,
    /// Auto-rotate speed; 2.0 is one turn per 30 s at 60 fps.
    pub auto_rotate_speed: f32,
    /// Rotation multiplier.
    pub rotate_speed: f32,
    /// Dolly multiplier.
    pub zoom_speed: f32,
    /// Pan multiplier.
    pub pan_speed: f32,

    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: true,
            min_distance: 0.0,
            max_distance: 200.0,
            min_polar_angle: 0.5,
            max_polar_angle: 1.4,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            delta: Spherical {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            },
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.delta.theta -= TAU * dx / viewport_height * self.rotate_speed;
        self.delta.phi -= TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Queue a pan from a pointer drag of `(dx, dy)` pixels. The pan is
    /// scaled so the point under the target follows the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &Camera) {
        if !self.enable_pan || viewport_height <= 0.0 {
            return;
        }
        let distance = (camera.position - self.target).length() * (camera.fov * 0.5).tan();
        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();

        let scale = 2.0 * distance / viewport_height * self.pan_speed;
        self.pan_offset += -right * dx * scale + up * dy * scale;
    }

    /// Queue a dolly. Positive steps move toward the target.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// Apply queued deltas to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let before = (camera.position, self.target);
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.auto_rotate {
            self.delta.theta -= TAU / 60.0 / 60.0 * self.auto_rotate_speed;
        }

        let blend = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta = wrap_angle(spherical.theta + self.delta.theta * blend);
        spherical.phi += self.delta.phi * blend;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.min_distance, self.max_distance)
            .max(MIN_RADIUS);

        self.target += self.pan_offset * blend;
        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta.theta = 0.0;
            self.delta.phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(before.0) > EPS
            || self.target.distance_squared(before.1) > EPS
    }
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, Camera) {
        let controls = OrbitControls::default();
        let camera = Camera::default();
        (controls, camera)
    }

    #[test]
    fn spherical_roundtrip() {
        let offset = Vec3::new(4.0, 9.0, 11.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-4);
    }

    #[test]
    fn idle_update_keeps_camera_still() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn zoom_is_clamped_to_max_distance() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.zoom(-500.0);
        assert!(controls.update(&mut camera));
        let distance = (camera.position - controls.target).length();
        assert!((distance - 200.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_recovers_after_reaching_the_target() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        for _ in 0..400 {
            controls.zoom(1.0);
            controls.update(&mut camera);
        }
        let closest = (camera.position - controls.target).length();
        assert!(closest >= MIN_RADIUS * 0.99);

        for _ in 0..400 {
            controls.zoom(-1.0);
            controls.update(&mut camera);
        }
        let distance = (camera.position - controls.target).length();
        assert!(camera.position.is_finite());
        assert!(distance > 1.0);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn zoom_in_reduces_distance() {
        let (mut controls, mut camera) = setup();
        let start = (camera.position - controls.target).length();
        controls.zoom(3.0);
        controls.update(&mut camera);
        assert!((camera.position - controls.target).length() < start);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.rotate(0.0, -10_000.0, 600.0);
        controls.update(&mut camera);
        let phi = Spherical::from_offset(camera.position - controls.target).phi;
        assert!((phi - controls.max_polar_angle).abs() < 1e-3);

        controls.rotate(0.0, 10_000.0, 600.0);
        controls.update(&mut camera);
        let phi = Spherical::from_offset(camera.position - controls.target).phi;
        assert!((phi - controls.min_polar_angle).abs() < 1e-3);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        let theta0 = Spherical::from_offset(camera.position - controls.target).theta;

        controls.rotate(60.0, 0.0, 600.0);
        controls.update(&mut camera);
        let first = Spherical::from_offset(camera.position - controls.target).theta - theta0;
        controls.update(&mut camera);
        let second = Spherical::from_offset(camera.position - controls.target).theta - theta0;

        let requested = -TAU * 60.0 / 600.0;
        assert!((first - requested * 0.05).abs() < 1e-4);
        assert!(second.abs() > first.abs());
        assert!(second.abs() < requested.abs());
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.update(&mut camera);
        let offset = camera.position - controls.target;

        controls.pan(100.0, 0.0, 600.0, &camera);
        assert!(controls.update(&mut camera));
        assert_ne!(controls.target, Vec3::new(0.0, 1.0, 0.0));
        assert!(((camera.position - controls.target) - offset).length() < 1e-3);
    }

    #[test]
    fn disabled_pan_is_ignored() {
        let (mut controls, mut camera) = setup();
        controls.enable_pan = false;
        controls.pan(100.0, 50.0, 600.0, &camera);
        controls.update(&mut camera);
        assert_eq!(controls.target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn auto_rotate_spins_when_idle() {
        let (mut controls, mut camera) = setup();
        controls.auto_rotate = true;
        controls.enable_damping = false;
        controls.update(&mut camera);
        assert!(controls.update(&mut camera));
    }
}
