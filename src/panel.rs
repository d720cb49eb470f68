//! Settings panel and loading overlay.

use sceneview_core::{
    Color, LightChange, LightParams, ModelChange, ModelParams, SettingsChange, SliderRange,
};

/// What the loading overlay shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Load in flight; percent complete.
    Loading(f32),
    /// Load failed; the message stays up.
    Failed(String),
    /// Nothing to show.
    Hidden,
}

/// Draw the settings window. `model` is `None` until the asset has loaded,
/// which keeps the model folder hidden. Edits are written into the params
/// and returned as changes for the caller to apply.
pub fn settings_panel(
    ctx: &egui::Context,
    model: Option<&mut ModelParams>,
    lights: &mut LightParams,
) -> Vec<SettingsChange> {
    let mut changes = Vec::new();

    egui::Window::new("Settings")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            if let Some(model) = model {
                ui.collapsing("Model", |ui| model_folder(ui, model, &mut changes));
            }
            ui.collapsing("Directional Light", |ui| {
                directional_folder(ui, lights, &mut changes)
            });
            ui.collapsing("Spot Light", |ui| spot_folder(ui, lights, &mut changes));
        });

    changes
}

fn model_folder(ui: &mut egui::Ui, model: &mut ModelParams, changes: &mut Vec<SettingsChange>) {
    let mut push = |change| changes.push(SettingsChange::Model(change));

    if slider(ui, "position x", &mut model.position_x, SliderRange::MODEL_POSITION) {
        push(ModelChange::PositionX(model.position_x));
    }
    if slider(ui, "position y", &mut model.position_y, SliderRange::MODEL_POSITION) {
        push(ModelChange::PositionY(model.position_y));
    }
    if slider(ui, "position z", &mut model.position_z, SliderRange::MODEL_POSITION) {
        push(ModelChange::PositionZ(model.position_z));
    }
    if slider(ui, "rotation x", &mut model.rotation_x, SliderRange::MODEL_ROTATION) {
        push(ModelChange::RotationX(model.rotation_x));
    }
    if slider(ui, "rotation y", &mut model.rotation_y, SliderRange::MODEL_ROTATION) {
        push(ModelChange::RotationY(model.rotation_y));
    }
    if slider(ui, "rotation z", &mut model.rotation_z, SliderRange::MODEL_ROTATION) {
        push(ModelChange::RotationZ(model.rotation_z));
    }
    if slider(ui, "scale", &mut model.scale, SliderRange::MODEL_SCALE) {
        push(ModelChange::Scale(model.scale));
    }
    if color(ui, "color", &mut model.color) {
        push(ModelChange::Color(model.color));
    }
    if ui.checkbox(&mut model.wireframe, "wireframe").changed() {
        push(ModelChange::Wireframe(model.wireframe));
    }
    if ui.checkbox(&mut model.animate, "animate").changed() {
        push(ModelChange::Animate(model.animate));
    }
}

fn directional_folder(
    ui: &mut egui::Ui,
    lights: &mut LightParams,
    changes: &mut Vec<SettingsChange>,
) {
    let mut push = |change| changes.push(SettingsChange::Light(change));

    if color(ui, "color", &mut lights.directional_color) {
        push(LightChange::DirectionalColor(lights.directional_color));
    }
    if slider(
        ui,
        "intensity",
        &mut lights.directional_intensity,
        SliderRange::LIGHT_INTENSITY,
    ) {
        push(LightChange::DirectionalIntensity(lights.directional_intensity));
    }
    if slider(ui, "x", &mut lights.directional_x, SliderRange::LIGHT_POSITION) {
        push(LightChange::DirectionalX(lights.directional_x));
    }
    if slider(ui, "y", &mut lights.directional_y, SliderRange::LIGHT_POSITION) {
        push(LightChange::DirectionalY(lights.directional_y));
    }
    if slider(ui, "z", &mut lights.directional_z, SliderRange::LIGHT_POSITION) {
        push(LightChange::DirectionalZ(lights.directional_z));
    }
}

fn spot_folder(ui: &mut egui::Ui, lights: &mut LightParams, changes: &mut Vec<SettingsChange>) {
    let mut push = |change| changes.push(SettingsChange::Light(change));

    if color(ui, "color", &mut lights.spot_color) {
        push(LightChange::SpotColor(lights.spot_color));
    }
    if slider(ui, "intensity", &mut lights.spot_intensity, SliderRange::LIGHT_INTENSITY) {
        push(LightChange::SpotIntensity(lights.spot_intensity));
    }
    if slider(ui, "x", &mut lights.spot_x, SliderRange::LIGHT_POSITION) {
        push(LightChange::SpotX(lights.spot_x));
    }
    if slider(ui, "y", &mut lights.spot_y, SliderRange::LIGHT_POSITION) {
        push(LightChange::SpotY(lights.spot_y));
    }
    if slider(ui, "z", &mut lights.spot_z, SliderRange::LIGHT_POSITION) {
        push(LightChange::SpotZ(lights.spot_z));
    }
    if slider(ui, "angle", &mut lights.spot_angle, SliderRange::SPOT_ANGLE) {
        push(LightChange::SpotAngle(lights.spot_angle));
    }
    if slider(ui, "penumbra", &mut lights.spot_penumbra, SliderRange::SPOT_PENUMBRA) {
        push(LightChange::SpotPenumbra(lights.spot_penumbra));
    }
    if slider(ui, "distance", &mut lights.spot_distance, SliderRange::SPOT_DISTANCE) {
        push(LightChange::SpotDistance(lights.spot_distance));
    }
}

fn slider(ui: &mut egui::Ui, label: &str, value: &mut f32, range: SliderRange) -> bool {
    ui.add(egui::Slider::new(value, range.inclusive()).text(label))
        .changed()
}

fn color(ui: &mut egui::Ui, label: &str, value: &mut Color) -> bool {
    let mut rgb = value.to_array();
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_srgb(&mut rgb).changed();
            ui.label(label);
            changed
        })
        .inner;
    if changed {
        *value = Color::from_array(rgb);
    }
    changed
}

/// Centered loading/failure message.
pub fn loading_overlay(ctx: &egui::Context, overlay: &Overlay) {
    let text = match overlay {
        Overlay::Loading(percent) => format!("Loading: {percent:.2}%"),
        Overlay::Failed(message) => format!("Failed to load model: {message}"),
        Overlay::Hidden => return,
    };

    egui::Area::new(egui::Id::new("loading_overlay"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 200))
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(text)
                            .size(20.0)
                            .color(egui::Color32::WHITE),
                    );
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(model: Option<&mut ModelParams>, lights: &mut LightParams) -> Vec<SettingsChange> {
        let ctx = egui::Context::default();
        let mut changes = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = settings_panel(ctx, model, lights);
        });
        changes
    }

    #[test]
    fn idle_frame_reports_no_changes() {
        let mut model = ModelParams::default();
        let mut lights = LightParams::default();

        let changes = run_frame(Some(&mut model), &mut lights);

        assert!(changes.is_empty());
        assert_eq!(model, ModelParams::default());
        assert_eq!(lights, LightParams::default());
    }

    #[test]
    fn panel_draws_before_the_model_is_loaded() {
        let mut lights = LightParams::default();
        assert!(run_frame(None, &mut lights).is_empty());
    }

    #[test]
    fn overlay_draws_every_state() {
        let ctx = egui::Context::default();
        for overlay in [
            Overlay::Loading(42.5),
            Overlay::Failed("missing file".into()),
            Overlay::Hidden,
        ] {
            let _ = ctx.run(egui::RawInput::default(), |ctx| loading_overlay(ctx, &overlay));
        }
    }
}
