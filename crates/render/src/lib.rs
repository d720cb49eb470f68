#![warn(missing_docs)]
//! Rendering facade built on top of wgpu + egui.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use sceneview_camera::Camera;
use sceneview_core::{Geometry, NodeId, Scene};
use wgpu::util::DeviceExt;
use winit::window::Window;

mod context;
mod gpu_mesh;
mod pipeline;
mod ui;
mod uniforms;
mod window;

pub use context::{RenderContext, DEPTH_FORMAT};
pub use gpu_mesh::{valid_triangle_indices, vertices_from_geometry, GpuMesh, MeshVertex};
pub use pipeline::{DrawMode, SurfacePipeline};
pub use ui::{UiFrame, UiManager};
pub use uniforms::{SceneUniform, SurfaceUniform};
pub use window::{WindowConfig, WindowManager};

/// Clear color behind the scene.
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.025,
    a: 1.0,
};

/// Per-surface GPU state: uniform buffer, bind group and shared mesh.
struct GpuSurface {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    geometry: *const Geometry,
    mesh: Rc<GpuMesh>,
}

/// Main renderer owning GPU resources.
pub struct Renderer {
    context: RenderContext,
    pipeline: SurfacePipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    ui: UiManager,
    meshes: HashMap<*const Geometry, (Arc<Geometry>, Rc<GpuMesh>)>,
    surfaces: HashMap<NodeId, GpuSurface>,
}

impl Renderer {
    /// Initialize GPU resources for a window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let context = RenderContext::new(window.clone()).await?;
        let pipeline = SurfacePipeline::new(&context)?;

        let scene_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Uniform Buffer"),
                contents: bytemuck::bytes_of(&SceneUniform::new(
                    &Camera::default(),
                    &sceneview_core::Lights::default(),
                )),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let scene_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Scene Bind Group"),
                layout: pipeline.scene_bind_group_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                }],
            });

        let depth_view = context.create_depth_view();
        let ui = UiManager::new(&context.device, context.config.format, &window);

        tracing::info!("renderer initialized");

        Ok(Self {
            context,
            pipeline,
            scene_buffer,
            scene_bind_group,
            depth_view,
            ui,
            meshes: HashMap::new(),
            surfaces: HashMap::new(),
        })
    }

    /// Current backbuffer size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.context.size
    }

    /// Resize the swapchain and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.context.resize(new_size);
        self.depth_view = self.context.create_depth_view();
    }

    /// Feed a window event to egui. Returns true when egui consumed it.
    pub fn handle_ui_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.ui.handle_event(window, event)
    }

    /// True while the pointer is over the UI.
    pub fn ui_wants_pointer(&self) -> bool {
        self.ui.wants_pointer_input()
    }

    /// Number of surfaces with live GPU state.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Draw the scene and the UI built by `ui_fn`, then present.
    pub fn render<F>(&mut self, window: &Window, scene: &Scene, camera: &Camera, ui_fn: F) -> Result<()>
    where
        F: FnOnce(&egui::Context),
    {
        let Some(frame) = self.context.acquire()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.context.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniform::new(camera, &scene.lights)),
        );
        let draws = self.sync_surfaces(scene);

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for (id, mode) in &draws {
                let Some(surface) = self.surfaces.get(id) else {
                    continue;
                };
                let mesh = &surface.mesh;
                let (buffer, count) = match mode {
                    DrawMode::Wireframe => (&mesh.edge_buffer, mesh.edge_count),
                    _ => (&mesh.index_buffer, mesh.index_count),
                };
                if count == 0 {
                    continue;
                }
                pass.set_pipeline(self.pipeline.pipeline(*mode));
                pass.set_bind_group(1, &surface.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..count, 0, 0..1);
            }
        }

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.context.config.width, self.context.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.ui.render(
            UiFrame {
                device: &self.context.device,
                queue: &self.context.queue,
                view: &view,
                screen,
            },
            &mut encoder,
            window,
            ui_fn,
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Upload per-surface uniforms, creating GPU state for new surfaces and
    /// dropping state for surfaces no longer in the scene.
    fn sync_surfaces(&mut self, scene: &Scene) -> Vec<(NodeId, DrawMode)> {
        let ids = scene.surface_ids();
        let mut draws = Vec::with_capacity(ids.len());
        let mut live = HashSet::with_capacity(ids.len());

        for id in ids {
            let Some(surface) = scene.surface(id) else {
                continue;
            };
            let world = scene.world_matrix(id);
            let uniform = SurfaceUniform::new(world, &surface.material);
            let mesh = self.mesh_for(&surface.geometry);
            let key = Arc::as_ptr(&surface.geometry);

            match self.surfaces.get_mut(&id) {
                Some(gpu) => {
                    if gpu.geometry != key {
                        gpu.geometry = key;
                        gpu.mesh = mesh;
                    }
                    self.context
                        .queue
                        .write_buffer(&gpu.buffer, 0, bytemuck::bytes_of(&uniform));
                }
                None => {
                    let gpu = self.create_surface(&uniform, key, mesh);
                    self.surfaces.insert(id, gpu);
                }
            }

            live.insert(id);
            draws.push((id, DrawMode::for_surface(&surface.material, world)));
        }

        self.surfaces.retain(|id, _| live.contains(id));
        self.meshes
            .retain(|_, (geometry, _)| Arc::strong_count(geometry) > 1);
        draws
    }

    fn mesh_for(&mut self, geometry: &Arc<Geometry>) -> Rc<GpuMesh> {
        let device = &self.context.device;
        self.meshes
            .entry(Arc::as_ptr(geometry))
            .or_insert_with(|| (geometry.clone(), Rc::new(GpuMesh::upload(device, geometry))))
            .1
            .clone()
    }

    fn create_surface(
        &self,
        uniform: &SurfaceUniform,
        geometry: *const Geometry,
        mesh: Rc<GpuMesh>,
    ) -> GpuSurface {
        let device = &self.context.device;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Surface Uniform Buffer"),
            contents: bytemuck::bytes_of(uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Surface Bind Group"),
            layout: self.pipeline.surface_bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        GpuSurface {
            buffer,
            bind_group,
            geometry,
            mesh,
        }
    }
}
