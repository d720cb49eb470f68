#![warn(missing_docs)]
//! Core primitives shared across the workspace: colors, transforms, ray
//! geometry, the scene graph and the settings bindings that mutate it.

pub mod color;
pub mod geometry;
pub mod lights;
pub mod scene;
pub mod settings;
pub mod transform;

pub use color::{Color, ColorParseError};
pub use geometry::{Aabb, Geometry, Ray, TriangleHit};
pub use lights::{AmbientLight, DirectionalLight, Lights, SpotLight};
pub use scene::{Material, Node, NodeId, Scene, Surface};
pub use settings::{
    apply_light_change, apply_model_change, LightChange, LightParams, ModelChange, ModelParams,
    SettingsChange, SliderRange,
};
pub use transform::Transform;
