//! Scene light rig: one ambient, one directional and one spot light.

use glam::Vec3;

use crate::color::Color;

/// Uniform light applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Light color.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Infinitely distant light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Light color.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Position the light shines from.
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Cone light aimed at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// Light color.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
    /// World position.
    pub position: Vec3,
    /// Range cutoff (0 = unlimited).
    pub distance: f32,
    /// Cone half-angle in radians.
    pub angle: f32,
    /// Fraction of the cone that fades out, 0..=1.
    pub penumbra: f32,
    /// Distance falloff exponent.
    pub decay: f32,
}

impl SpotLight {
    /// Unit vector along the cone axis.
    pub fn axis(&self) -> Vec3 {
        (-self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }
}

/// All lights in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    /// Ambient term.
    pub ambient: AmbientLight,
    /// Key light.
    pub directional: DirectionalLight,
    /// Spot light.
    pub spot: SpotLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: 0.5,
            },
            directional: DirectionalLight {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(5.0, 10.0, 5.0),
            },
            spot: SpotLight {
                color: Color::WHITE,
                intensity: 5.0,
                position: Vec3::new(0.0, 15.0, 5.0),
                distance: 50.0,
                angle: std::f32::consts::FRAC_PI_6,
                penumbra: 0.3,
                decay: 1.0,
            },
        }
    }
}
