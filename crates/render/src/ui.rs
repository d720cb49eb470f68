//! egui integration for the settings panel and overlays.

use egui_wgpu::ScreenDescriptor;

/// Borrowed GPU state needed to draw one egui frame.
pub struct UiFrame<'a> {
    /// Device for texture and buffer uploads.
    pub device: &'a wgpu::Device,
    /// Queue for uploads and extra command buffers.
    pub queue: &'a wgpu::Queue,
    /// Target view (the swapchain texture).
    pub view: &'a wgpu::TextureView,
    /// Size and scale of the target.
    pub screen: ScreenDescriptor,
}

/// UI overlay manager using egui.
pub struct UiManager {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
    state: egui_winit::State,
}

impl UiManager {
    /// Create a new UI manager.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &winit::window::Window,
    ) -> Self {
        let context = egui::Context::default();

        let viewport_id = context.viewport_id();
        let state = egui_winit::State::new(context.clone(), viewport_id, window, None, None);

        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1);

        Self {
            context,
            renderer,
            state,
        }
    }

    /// Feed a window event to egui. Returns true when egui consumed it.
    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// True while the pointer is over a panel or dragging a widget.
    pub fn wants_pointer_input(&self) -> bool {
        self.context.wants_pointer_input() || self.context.is_pointer_over_area()
    }

    /// Run `ui_fn` and record the egui pass on top of the frame.
    pub fn render<F>(
        &mut self,
        frame: UiFrame<'_>,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        ui_fn: F,
    ) where
        F: FnOnce(&egui::Context),
    {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.context.run(raw_input, ui_fn);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in full_output.textures_delta.set {
            self.renderer
                .update_texture(frame.device, frame.queue, id, &image_delta);
        }

        let extra = self.renderer.update_buffers(
            frame.device,
            frame.queue,
            encoder,
            &paint_jobs,
            &frame.screen,
        );
        if !extra.is_empty() {
            frame.queue.submit(extra);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            self.renderer
                .render(&mut render_pass, &paint_jobs, &frame.screen);
        }

        for id in full_output.textures_delta.free {
            self.renderer.free_texture(&id);
        }
    }
}
