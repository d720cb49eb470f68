//! Viewer window and the winit event loop.

use anyhow::Result;
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

/// Smallest inner size the window can be dragged down to.
const MIN_SIZE: PhysicalSize<u32> = PhysicalSize::new(320, 240);

/// Title and initial inner size of the viewer window.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Inner width in physical pixels.
    pub width: u32,
    /// Inner height in physical pixels.
    pub height: u32,
}

/// Owns the viewer window and its event loop.
pub struct WindowManager {
    window: Arc<Window>,
    event_loop: EventLoop<()>,
}

impl WindowManager {
    /// Open the window. Sizes below the minimum are raised to it.
    pub fn new(config: WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let size = PhysicalSize::new(
            config.width.max(MIN_SIZE.width),
            config.height.max(MIN_SIZE.height),
        );

        let window = WindowBuilder::new()
            .with_title(config.title)
            .with_inner_size(size)
            .with_min_inner_size(MIN_SIZE)
            .build(&event_loop)?;

        tracing::debug!(width = size.width, height = size.height, "window created");
        Ok(Self {
            window: Arc::new(window),
            event_loop,
        })
    }

    /// Shared handle for the renderer's surface.
    pub fn window(&self) -> Arc<Window> {
        self.window.clone()
    }

    /// Run until `on_event` returns false.
    ///
    /// Only events for this window reach the callback, and a redraw is
    /// requested each time the loop goes idle so the viewer renders
    /// continuously.
    pub fn run<F>(self, mut on_event: F) -> Result<()>
    where
        F: FnMut(WindowEvent, &Window) -> bool + 'static,
    {
        let window = self.window;
        self.event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                if !on_event(event, &window) {
                    elwt.exit();
                }
            }
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })?;

        Ok(())
    }
}
