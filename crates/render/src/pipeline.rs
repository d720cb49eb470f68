use anyhow::Result;
use glam::Mat4;
use sceneview_core::Material;

use crate::context::{RenderContext, DEPTH_FORMAT};
use crate::gpu_mesh::MeshVertex;

/// How a surface is rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Filled triangles, back faces culled.
    Fill,
    /// `Fill` for a world matrix that flips handedness; clockwise is front.
    FillMirrored,
    /// Filled triangles, both faces drawn.
    FillDoubleSided,
    /// `FillDoubleSided` with clockwise front faces.
    FillDoubleSidedMirrored,
    /// Triangle edges as lines.
    Wireframe,
}

impl DrawMode {
    /// Pick the draw mode for a surface's material and world matrix.
    ///
    /// A negative determinant mirrors the mesh, which reverses the screen
    /// winding of its local front faces.
    pub fn for_surface(material: &Material, world: Mat4) -> Self {
        let mirrored = world.determinant() < 0.0;
        match (material.wireframe, material.double_sided, mirrored) {
            (true, _, _) => Self::Wireframe,
            (false, true, false) => Self::FillDoubleSided,
            (false, true, true) => Self::FillDoubleSidedMirrored,
            (false, false, false) => Self::Fill,
            (false, false, true) => Self::FillMirrored,
        }
    }
}

/// Lit surface pipelines plus their shared bind group layouts.
pub struct SurfacePipeline {
    fill: wgpu::RenderPipeline,
    fill_mirrored: wgpu::RenderPipeline,
    fill_double_sided: wgpu::RenderPipeline,
    fill_double_sided_mirrored: wgpu::RenderPipeline,
    wireframe: wgpu::RenderPipeline,
    scene_bind_group_layout: wgpu::BindGroupLayout,
    surface_bind_group_layout: wgpu::BindGroupLayout,
}

impl SurfacePipeline {
    /// Create the surface pipelines.
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let device = &ctx.device;

        let scene_bind_group_layout = uniform_layout(
            device,
            "Scene Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let surface_bind_group_layout = uniform_layout(
            device,
            "Surface Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/surface.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &surface_bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, topology, front_face, cull_mode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[MeshVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let triangles = wgpu::PrimitiveTopology::TriangleList;
        let fill = build(
            "Surface Fill Pipeline",
            triangles,
            wgpu::FrontFace::Ccw,
            Some(wgpu::Face::Back),
        );
        let fill_mirrored = build(
            "Surface Mirrored Fill Pipeline",
            triangles,
            wgpu::FrontFace::Cw,
            Some(wgpu::Face::Back),
        );
        let fill_double_sided = build(
            "Surface Double-Sided Pipeline",
            triangles,
            wgpu::FrontFace::Ccw,
            None,
        );
        let fill_double_sided_mirrored = build(
            "Surface Mirrored Double-Sided Pipeline",
            triangles,
            wgpu::FrontFace::Cw,
            None,
        );
        let wireframe = build(
            "Surface Wireframe Pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::FrontFace::Ccw,
            None,
        );

        Ok(Self {
            fill,
            fill_mirrored,
            fill_double_sided,
            fill_double_sided_mirrored,
            wireframe,
            scene_bind_group_layout,
            surface_bind_group_layout,
        })
    }

    /// Pipeline for a draw mode.
    pub fn pipeline(&self, mode: DrawMode) -> &wgpu::RenderPipeline {
        match mode {
            DrawMode::Fill => &self.fill,
            DrawMode::FillMirrored => &self.fill_mirrored,
            DrawMode::FillDoubleSided => &self.fill_double_sided,
            DrawMode::FillDoubleSidedMirrored => &self.fill_double_sided_mirrored,
            DrawMode::Wireframe => &self.wireframe,
        }
    }

    /// Layout for bind group 0 (scene uniform).
    pub fn scene_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.scene_bind_group_layout
    }

    /// Layout for bind group 1 (surface uniform).
    pub fn surface_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.surface_bind_group_layout
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}
