//! Uniform blocks shared with `shaders/surface.wgsl`.

use glam::Mat4;
use sceneview_camera::Camera;
use sceneview_core::{Color, Lights, Material};

/// Per-frame camera and light data (bind group 0).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    /// View-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space
    pub camera_pos: [f32; 4],
    /// Ambient color premultiplied by intensity
    pub ambient: [f32; 4],
    /// Directional color premultiplied by intensity
    pub dir_color: [f32; 4],
    /// Unit vector toward the directional light
    pub dir_direction: [f32; 4],
    /// Spot color premultiplied by intensity
    pub spot_color: [f32; 4],
    /// Spot position, w = range (0 = unlimited)
    pub spot_position: [f32; 4],
    /// Spot axis, w = cos(outer angle)
    pub spot_axis: [f32; 4],
    /// x = cos(inner angle), y = decay
    pub spot_params: [f32; 4],
}

impl SceneUniform {
    /// Build from the camera and the scene's lights.
    pub fn new(camera: &Camera, lights: &Lights) -> Self {
        let spot = &lights.spot;
        let cos_outer = spot.angle.cos();
        // smoothstep needs distinct edges even with a hard-edged cone.
        let cos_inner = (spot.angle * (1.0 - spot.penumbra.clamp(0.0, 1.0)))
            .cos()
            .max(cos_outer + 1e-4);
        let dir = lights.directional.direction_to_light();
        let axis = spot.axis();

        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            dir_color: scaled(lights.directional.color, lights.directional.intensity),
            dir_direction: dir.extend(0.0).to_array(),
            spot_color: scaled(spot.color, spot.intensity),
            spot_position: spot.position.extend(spot.distance).to_array(),
            spot_axis: axis.extend(cos_outer).to_array(),
            spot_params: [cos_inner, spot.decay, 0.0, 0.0],
        }
    }
}

/// Per-surface transform and color (bind group 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniform {
    /// Local-to-world matrix
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGBA color
    pub color: [f32; 4],
}

impl SurfaceUniform {
    /// Build from a world matrix and material.
    pub fn new(world: Mat4, material: &Material) -> Self {
        let normal = if world.determinant() == 0.0 {
            world
        } else {
            world.inverse().transpose()
        };
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: normal.to_cols_array_2d(),
            color: material.color.to_linear_rgba(),
        }
    }
}

fn scaled(color: Color, intensity: f32) -> [f32; 4] {
    let [r, g, b, _] = color.to_linear_rgba();
    [r * intensity, g * intensity, b * intensity, 1.0]
}
