//! Tweakable model and light parameters, and the one-way bindings that
//! push edits into the scene.
//!
//! The settings panel owns a [`ModelParams`] and a [`LightParams`], edits them
//! in place, and reports each edit as a [`SettingsChange`]. The viewer then
//! applies the change with [`apply_model_change`] / [`apply_light_change`].

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, TAU};
use std::ops::RangeInclusive;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::lights::Lights;
use crate::scene::{NodeId, Scene};
use crate::transform::Transform;

/// Closed slider range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl SliderRange {
    /// Model position sliders.
    pub const MODEL_POSITION: Self = Self::new(-10.0, 10.0);
    /// Model rotation sliders (radians).
    pub const MODEL_ROTATION: Self = Self::new(0.0, TAU);
    /// Uniform model scale.
    pub const MODEL_SCALE: Self = Self::new(0.1, 5.0);
    /// Light intensity.
    pub const LIGHT_INTENSITY: Self = Self::new(0.0, 10.0);
    /// Light position components.
    pub const LIGHT_POSITION: Self = Self::new(-20.0, 20.0);
    /// Spot cone half-angle (radians).
    pub const SPOT_ANGLE: Self = Self::new(0.0, FRAC_PI_2);
    /// Spot penumbra fraction.
    pub const SPOT_PENUMBRA: Self = Self::new(0.0, 1.0);
    /// Spot range cutoff.
    pub const SPOT_DISTANCE: Self = Self::new(0.0, 200.0);

    /// Create a range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range form accepted by slider widgets.
    pub fn inclusive(self) -> RangeInclusive<f32> {
        self.min..=self.max
    }

    /// Clamp `value` into the range.
    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Parameters bound to the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// X translation.
    pub position_x: f32,
    /// Y translation.
    pub position_y: f32,
    /// Z translation.
    pub position_z: f32,
    /// Rotation about X (radians).
    pub rotation_x: f32,
    /// Rotation about Y (radians).
    pub rotation_y: f32,
    /// Rotation about Z (radians).
    pub rotation_z: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Baseline color for every model surface.
    pub color: Color,
    /// Wireframe rendering for every model surface.
    pub wireframe: bool,
    /// Spin the model about Y every frame.
    pub animate: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            position_x: -1.64,
            position_y: -4.0,
            position_z: -1.64,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_z: 0.0,
            scale: 1.0,
            color: Color::WHITE,
            wireframe: false,
            animate: false,
        }
    }
}

impl ModelParams {
    /// Transform described by the position/rotation/scale fields.
    pub fn transform(&self) -> Transform {
        Transform {
            translation: Vec3::new(self.position_x, self.position_y, self.position_z),
            rotation: Vec3::new(self.rotation_x, self.rotation_y, self.rotation_z),
            scale: Vec3::splat(self.scale),
        }
    }
}

/// Parameters bound to the directional and spot lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// Directional light color.
    pub directional_color: Color,
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// Directional light X position.
    pub directional_x: f32,
    /// Directional light Y position.
    pub directional_y: f32,
    /// Directional light Z position.
    pub directional_z: f32,
    /// Spot light color.
    pub spot_color: Color,
    /// Spot light intensity.
    pub spot_intensity: f32,
    /// Spot light X position.
    pub spot_x: f32,
    /// Spot light Y position.
    pub spot_y: f32,
    /// Spot light Z position.
    pub spot_z: f32,
    /// Spot cone half-angle (radians).
    pub spot_angle: f32,
    /// Spot penumbra fraction.
    pub spot_penumbra: f32,
    /// Spot range cutoff.
    pub spot_distance: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            directional_color: Color::WHITE,
            directional_intensity: 1.0,
            directional_x: 5.0,
            directional_y: 10.0,
            directional_z: 5.0,
            spot_color: Color::WHITE,
            spot_intensity: 5.0,
            spot_x: 0.0,
            spot_y: 15.0,
            spot_z: 5.0,
            spot_angle: FRAC_PI_6,
            spot_penumbra: 0.3,
            spot_distance: 50.0,
        }
    }
}

impl LightParams {
    /// Write every field into `lights` (used once at startup).
    pub fn apply_all(&self, lights: &mut Lights) {
        let changes = [
            LightChange::DirectionalColor(self.directional_color),
            LightChange::DirectionalIntensity(self.directional_intensity),
            LightChange::DirectionalX(self.directional_x),
            LightChange::DirectionalY(self.directional_y),
            LightChange::DirectionalZ(self.directional_z),
            LightChange::SpotColor(self.spot_color),
            LightChange::SpotIntensity(self.spot_intensity),
            LightChange::SpotX(self.spot_x),
            LightChange::SpotY(self.spot_y),
            LightChange::SpotZ(self.spot_z),
            LightChange::SpotAngle(self.spot_angle),
            LightChange::SpotPenumbra(self.spot_penumbra),
            LightChange::SpotDistance(self.spot_distance),
        ];
        for change in changes {
            apply_light_change(lights, change);
        }
    }
}

/// A single edit to a model parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelChange {
    /// New X translation.
    PositionX(f32),
    /// New Y translation.
    PositionY(f32),
    /// New Z translation.
    PositionZ(f32),
    /// New rotation about X.
    RotationX(f32),
    /// New rotation about Y.
    RotationY(f32),
    /// New rotation about Z.
    RotationZ(f32),
    /// New uniform scale.
    Scale(f32),
    /// New baseline color.
    Color(Color),
    /// Wireframe toggled.
    Wireframe(bool),
    /// Animation toggled.
    Animate(bool),
}

/// A single edit to a light parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightChange {
    /// Directional color.
    DirectionalColor(Color),
    /// Directional intensity.
    DirectionalIntensity(f32),
    /// Directional X position.
    DirectionalX(f32),
    /// Directional Y position.
    DirectionalY(f32),
    /// Directional Z position.
    DirectionalZ(f32),
    /// Spot color.
    SpotColor(Color),
    /// Spot intensity.
    SpotIntensity(f32),
    /// Spot X position.
    SpotX(f32),
    /// Spot Y position.
    SpotY(f32),
    /// Spot Z position.
    SpotZ(f32),
    /// Spot cone half-angle.
    SpotAngle(f32),
    /// Spot penumbra.
    SpotPenumbra(f32),
    /// Spot range.
    SpotDistance(f32),
}

/// Any edit reported by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsChange {
    /// Model folder edit.
    Model(ModelChange),
    /// Light folder edit.
    Light(LightChange),
}

/// Push a model edit into the scene.
///
/// Transform edits write the `model` root node; color and wireframe edits
/// write every surface in the model subtree. Returns the number of surfaces
/// whose material was touched.
pub fn apply_model_change(scene: &mut Scene, model: NodeId, change: ModelChange) -> usize {
    if let Some(node) = scene.node_mut(model) {
        let transform = &mut node.transform;
        match change {
            ModelChange::PositionX(v) => transform.translation.x = v,
            ModelChange::PositionY(v) => transform.translation.y = v,
            ModelChange::PositionZ(v) => transform.translation.z = v,
            ModelChange::RotationX(v) => transform.rotation.x = v,
            ModelChange::RotationY(v) => transform.rotation.y = v,
            ModelChange::RotationZ(v) => transform.rotation.z = v,
            ModelChange::Scale(v) => transform.set_uniform_scale(v),
            ModelChange::Color(_) | ModelChange::Wireframe(_) | ModelChange::Animate(_) => {}
        }
    } else {
        return 0;
    }

    let surfaces = match change {
        ModelChange::Color(_) | ModelChange::Wireframe(_) => scene.surface_ids_under(model),
        _ => return 0,
    };

    for id in &surfaces {
        if let Some(surface) = scene.surface_mut(*id) {
            match change {
                ModelChange::Color(color) => surface.material.color = color,
                ModelChange::Wireframe(on) => surface.material.wireframe = on,
                _ => {}
            }
        }
    }
    surfaces.len()
}

/// Push a light edit into the light rig.
pub fn apply_light_change(lights: &mut Lights, change: LightChange) {
    let directional = &mut lights.directional;
    let spot = &mut lights.spot;
    match change {
        LightChange::DirectionalColor(c) => directional.color = c,
        LightChange::DirectionalIntensity(v) => directional.intensity = v,
        LightChange::DirectionalX(v) => directional.position.x = v,
        LightChange::DirectionalY(v) => directional.position.y = v,
        LightChange::DirectionalZ(v) => directional.position.z = v,
        LightChange::SpotColor(c) => spot.color = c,
        LightChange::SpotIntensity(v) => spot.intensity = v,
        LightChange::SpotX(v) => spot.position.x = v,
        LightChange::SpotY(v) => spot.position.y = v,
        LightChange::SpotZ(v) => spot.position.z = v,
        LightChange::SpotAngle(v) => spot.angle = v,
        LightChange::SpotPenumbra(v) => spot.penumbra = v,
        LightChange::SpotDistance(v) => spot.distance = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::scene::{Material, Node, Surface};
    use std::sync::Arc;

    fn model_scene() -> (Scene, NodeId, NodeId) {
        let geometry = Arc::new(Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            None,
            vec![0, 1, 2],
        ));
        let mut scene = Scene::new();
        let model = scene.add_child(scene.root(), Node::new("model")).unwrap();
        for name in ["hull", "mast"] {
            scene
                .add_child(
                    model,
                    Node::new(name)
                        .with_surface(Surface::new(geometry.clone(), Material::default())),
                )
                .unwrap();
        }
        let bystander = scene
            .add_child(
                scene.root(),
                Node::new("bystander").with_surface(Surface::new(geometry, Material::default())),
            )
            .unwrap();
        (scene, model, bystander)
    }

    #[test]
    fn transform_changes_write_model_root() {
        let (mut scene, model, _) = model_scene();
        apply_model_change(&mut scene, model, ModelChange::PositionY(3.0));
        apply_model_change(&mut scene, model, ModelChange::RotationZ(1.0));
        apply_model_change(&mut scene, model, ModelChange::Scale(2.5));

        let transform = scene.node(model).unwrap().transform;
        assert_eq!(transform.translation.y, 3.0);
        assert_eq!(transform.rotation.z, 1.0);
        assert_eq!(transform.scale, Vec3::splat(2.5));
    }

    #[test]
    fn color_change_paints_only_model_surfaces() {
        let (mut scene, model, bystander) = model_scene();
        let red = Color::rgb(255, 0, 0);
        let touched = apply_model_change(&mut scene, model, ModelChange::Color(red));

        assert_eq!(touched, 2);
        for id in scene.surface_ids_under(model) {
            assert_eq!(scene.surface(id).unwrap().material.color, red);
        }
        assert_eq!(
            scene.surface(bystander).unwrap().material.color,
            Color::WHITE
        );
    }

    #[test]
    fn wireframe_toggle_reaches_every_model_surface() {
        let (mut scene, model, _) = model_scene();
        apply_model_change(&mut scene, model, ModelChange::Wireframe(true));
        assert!(scene
            .surface_ids_under(model)
            .into_iter()
            .all(|id| scene.surface(id).unwrap().material.wireframe));
    }

    #[test]
    fn animate_toggle_does_not_touch_scene() {
        let (mut scene, model, _) = model_scene();
        let before = scene.node(model).unwrap().transform;
        assert_eq!(
            apply_model_change(&mut scene, model, ModelChange::Animate(true)),
            0
        );
        assert_eq!(scene.node(model).unwrap().transform, before);
    }

    #[test]
    fn light_params_defaults_match_light_rig() {
        let mut lights = Lights::default();
        LightParams::default().apply_all(&mut lights);
        assert_eq!(lights, Lights::default());
    }

    #[test]
    fn light_changes_write_fields() {
        let mut lights = Lights::default();
        apply_light_change(&mut lights, LightChange::DirectionalX(-7.0));
        apply_light_change(&mut lights, LightChange::SpotAngle(0.25));
        apply_light_change(&mut lights, LightChange::SpotColor(Color::GREEN));
        assert_eq!(lights.directional.position.x, -7.0);
        assert_eq!(lights.spot.angle, 0.25);
        assert_eq!(lights.spot.color, Color::GREEN);
    }

    #[test]
    fn slider_ranges_clamp() {
        assert_eq!(SliderRange::MODEL_SCALE.clamp(0.0), 0.1);
        assert_eq!(SliderRange::MODEL_POSITION.clamp(11.0), 10.0);
        assert!(SliderRange::MODEL_ROTATION.inclusive().contains(&std::f32::consts::PI));
    }
}
