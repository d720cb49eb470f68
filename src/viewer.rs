//! Viewer state and the winit event handler.

use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::Result;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sceneview_assets::{AssetLoader, LoadEvent, LoadHandle, LoadedAsset};
use sceneview_camera::{Camera, OrbitControls};
use sceneview_core::{
    apply_light_change, apply_model_change, LightParams, ModelChange, ModelParams, NodeId, Scene,
    SettingsChange,
};
use sceneview_input::{InputState, PointerEvent};
use sceneview_picking::{PointerController, PointerOutcome};
use sceneview_render::Renderer;
use tracing::{debug, error, info, warn};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::config::ViewerConfig;
use crate::panel::{self, Overlay};

/// Per-frame model spin while `animate` is on.
const ANIMATION_STEP: f32 = 0.01;

/// Everything the viewer owns apart from GPU resources.
pub struct ViewerState {
    pub scene: Scene,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub input: InputState,
    pub controller: PointerController,
    pub model_params: ModelParams,
    pub light_params: LightParams,
    pub overlay: Overlay,
    model: Option<NodeId>,
    load: Option<LoadHandle>,
    rng: StdRng,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: &ViewerConfig, rng: StdRng) -> Self {
        let mut scene = Scene::new();
        config.lights.apply_all(&mut scene.lights);

        let mut camera = Camera::default();
        let mut orbit = config.orbit.controls();
        orbit.update(&mut camera);

        Self {
            scene,
            camera,
            orbit,
            input: InputState::new(),
            controller: PointerController::new(config.hover_color),
            model_params: config.model.clone(),
            light_params: config.lights.clone(),
            overlay: Overlay::Hidden,
            model: None,
            load: None,
            rng,
        }
    }

    /// Root node of the loaded model.
    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    /// Start loading the asset in the background.
    pub fn start_load(&mut self, path: impl Into<PathBuf>) {
        let handle = AssetLoader::spawn(path);
        info!(path = %handle.path().display(), "Loading model");
        self.load = Some(handle);
        self.overlay = Overlay::Loading(0.0);
    }

    /// True while a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.load.is_some()
    }

    /// Drain load events; attaches the model on success.
    pub fn poll_load(&mut self) {
        let Some(handle) = self.load.as_mut() else {
            return;
        };
        let path = handle.path().to_path_buf();

        for event in handle.poll() {
            let terminal = event.is_terminal();
            match event {
                LoadEvent::Progress(progress) => {
                    let percent = progress.percent();
                    info!("Loading: {percent:.2}%");
                    self.overlay = Overlay::Loading(percent);
                }
                LoadEvent::Loaded(asset) => self.attach(asset),
                LoadEvent::Failed(err) => {
                    error!(path = %path.display(), %err, "Failed to load model");
                    self.overlay = Overlay::Failed(err.to_string());
                }
                LoadEvent::Cancelled => {
                    info!(path = %path.display(), "Model load cancelled");
                    self.overlay = Overlay::Hidden;
                }
            }
            if terminal {
                self.load = None;
                break;
            }
        }
    }

    /// Attach a loaded fragment under the scene root.
    pub fn attach(&mut self, asset: LoadedAsset) {
        let root = self.scene.root();
        let Some(model) = self.scene.attach(root, asset.scene) else {
            warn!(path = %asset.source.display(), "Loaded model could not be attached");
            return;
        };
        if let Some(node) = self.scene.node_mut(model) {
            node.transform = self.model_params.transform();
        }
        if self.model_params.wireframe {
            apply_model_change(&mut self.scene, model, ModelChange::Wireframe(true));
        }

        self.model = Some(model);
        self.overlay = Overlay::Hidden;
        info!(
            path = %asset.source.display(),
            surfaces = asset.surfaces,
            "Model loaded"
        );
    }

    /// Route a pointer event to the picking controller.
    pub fn pointer(&mut self, event: PointerEvent, viewport: (u32, u32)) -> PointerOutcome {
        match event {
            PointerEvent::Moved(position) => self.controller.on_move(
                &mut self.scene,
                &self.camera,
                viewport,
                position,
                self.model_params.color,
            ),
            PointerEvent::Clicked(position) => self.controller.on_click(
                &mut self.scene,
                &self.camera,
                viewport,
                position,
                &mut self.rng,
            ),
        }
    }

    /// Push a panel edit into the scene. Model edits before the model has
    /// loaded only update the parameters.
    pub fn apply(&mut self, change: SettingsChange) {
        match change {
            SettingsChange::Model(change) => {
                if let Some(model) = self.model {
                    let touched = apply_model_change(&mut self.scene, model, change);
                    debug!(?change, touched, "Model setting applied");
                }
            }
            SettingsChange::Light(change) => {
                apply_light_change(&mut self.scene.lights, change);
                debug!(?change, "Light setting applied");
            }
        }
    }

    /// Advance one frame: model animation, orbit input, camera update.
    pub fn update(&mut self, viewport: (u32, u32)) {
        if self.model_params.animate {
            if let Some(model) = self.model {
                self.model_params.rotation_y =
                    (self.model_params.rotation_y + ANIMATION_STEP).rem_euclid(TAU);
                apply_model_change(
                    &mut self.scene,
                    model,
                    ModelChange::RotationY(self.model_params.rotation_y),
                );
            }
        }

        let height = viewport.1 as f32;
        let rotate = self.input.rotate_delta;
        let pan = self.input.pan_delta;
        if rotate != Vec2::ZERO {
            self.orbit.rotate(rotate.x, rotate.y, height);
        }
        if pan != Vec2::ZERO {
            self.orbit.pan(pan.x, pan.y, height, &self.camera);
        }
        if self.input.wheel_delta != 0.0 {
            self.orbit.zoom(self.input.wheel_delta);
        }
        self.orbit.update(&mut self.camera);
        self.input.begin_frame();
    }
}

/// Window-bound viewer: state plus renderer.
pub struct Viewer {
    state: ViewerState,
    renderer: Renderer,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, renderer: Renderer) -> Self {
        let mut state = ViewerState::new(config);
        let (width, height) = renderer.size();
        state.camera.set_viewport(width, height);
        state.start_load(config.asset.clone());
        Self { state, renderer }
    }

    /// Handle one window event. Returns false to exit.
    pub fn window_event(&mut self, event: WindowEvent, window: &Window) -> bool {
        let consumed = self.renderer.handle_ui_event(window, &event);

        match event {
            WindowEvent::CloseRequested => return false,
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => return false,
            WindowEvent::Resized(size) => {
                self.renderer.resize((size.width, size.height));
                self.state.camera.set_viewport(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.frame(window) {
                    error!(%err, "Frame failed");
                    return false;
                }
            }
            other => self.pointer_event(&other, consumed),
        }
        true
    }

    fn pointer_event(&mut self, event: &WindowEvent, consumed: bool) {
        let over_ui = consumed || self.renderer.ui_wants_pointer();
        let starts_gesture = matches!(
            event,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } | WindowEvent::MouseWheel { .. }
        );
        if over_ui && starts_gesture {
            return;
        }

        if let Some(pointer) = self.state.input.handle_event(event) {
            if over_ui {
                return;
            }
            let outcome = self.state.pointer(pointer, self.renderer.size());
            if matches!(outcome, PointerOutcome::Painted { .. }) {
                info!(?outcome, "Surface clicked");
            }
        }
    }

    fn frame(&mut self, window: &Window) -> Result<()> {
        if self.state.is_loading() {
            self.state.poll_load();
        }
        self.state.update(self.renderer.size());

        let state = &mut self.state;
        let model = state.model.is_some().then_some(&mut state.model_params);
        let lights = &mut state.light_params;
        let overlay = &state.overlay;
        let mut changes = Vec::new();

        self.renderer
            .render(window, &state.scene, &state.camera, |ctx| {
                changes = panel::settings_panel(ctx, model, lights);
                panel::loading_overlay(ctx, overlay);
            })?;

        for change in changes {
            self.state.apply(change);
        }
        Ok(())
    }
}
