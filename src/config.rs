use anyhow::Result;
use sceneview_camera::OrbitControls;
use sceneview_core::{Color, LightParams, ModelParams};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/viewer.toml";
pub const DEFAULT_ASSET_PATH: &str = "public/home/scene.gltf";

/// Viewer settings read at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// glTF file to load.
    pub asset: PathBuf,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Color applied to the surface under the pointer.
    pub hover_color: Color,
    pub model: ModelParams,
    pub lights: LightParams,
    pub orbit: OrbitSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset: PathBuf::from(DEFAULT_ASSET_PATH),
            width: 1280,
            height: 720,
            hover_color: Color::GREEN,
            model: ModelParams::default(),
            lights: LightParams::default(),
            orbit: OrbitSettings::default(),
        }
    }
}

/// Orbit control tuning.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        let controls = OrbitControls::default();
        Self {
            damping: controls.enable_damping,
            damping_factor: controls.damping_factor,
            auto_rotate: controls.auto_rotate,
            auto_rotate_speed: controls.auto_rotate_speed,
            min_distance: controls.min_distance,
            max_distance: controls.max_distance,
            min_polar_angle: controls.min_polar_angle,
            max_polar_angle: controls.max_polar_angle,
        }
    }
}

impl OrbitSettings {
    /// Build orbit controls with these settings.
    pub fn controls(&self) -> OrbitControls {
        let mut controls = OrbitControls::default();
        controls.enable_damping = self.damping;
        controls.damping_factor = self.damping_factor;
        controls.auto_rotate = self.auto_rotate;
        controls.auto_rotate_speed = self.auto_rotate_speed;
        controls.min_distance = self.min_distance;
        controls.max_distance = self.max_distance;
        controls.min_polar_angle = self.min_polar_angle;
        controls.max_polar_angle = self.max_polar_angle;
        controls
    }
}

impl ViewerConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ViewerConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ViewerConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Viewer config not found at {}. Using defaults",
                        path.display()
                    );
                }
                ViewerConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
