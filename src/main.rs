//! sceneview - a glTF scene viewer with hover highlighting and click-to-paint
//!
//! Main executable: window, renderer, settings panel

mod config;
mod panel;
mod viewer;

use anyhow::Result;
use config::ViewerConfig;
use sceneview_render::{Renderer, WindowConfig, WindowManager};
use std::{env, path::PathBuf};
use tracing::info;
use viewer::Viewer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sceneview=info,warn")),
        )
        .init();

    info!("Starting sceneview v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load_from_path(path),
        None => ViewerConfig::load(),
    };
    if let Some(asset) = cli.asset {
        config.asset = asset;
    }
    if let Some((width, height)) = cli.resolution {
        config.width = width;
        config.height = height;
    }

    let manager = WindowManager::new(WindowConfig {
        title: format!("sceneview - {}", config.asset.display()),
        width: config.width,
        height: config.height,
    })?;
    let renderer = pollster::block_on(Renderer::new(manager.window()))?;
    let mut viewer = Viewer::new(&config, renderer);

    manager.run(move |event, window| viewer.window_event(event, window))?;

    info!("Exiting");
    Ok(())
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    asset: Option<PathBuf>,
    config: Option<PathBuf>,
    resolution: Option<(u32, u32)>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--asset" => {
                    if let Some(path) = args.next() {
                        opts.asset = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--asset requires a file path");
                    }
                }
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--resolution" => {
                    if let Some(raw) = args.next() {
                        match raw.split_once('x') {
                            Some((w, h)) => match (w.parse::<u32>(), h.parse::<u32>()) {
                                (Ok(width), Ok(height)) if width > 0 && height > 0 => {
                                    opts.resolution = Some((width, height));
                                }
                                _ => {
                                    tracing::error!(value = %raw, "--resolution must be like 1280x720");
                                }
                            },
                            None => {
                                tracing::error!(value = %raw, "--resolution must be like 1280x720");
                            }
                        }
                    } else {
                        tracing::error!("--resolution requires a value like 1280x720");
                    }
                }
                other => {
                    tracing::error!(arg = %other, "Unknown argument ignored");
                }
            }
        }

        opts
    }
}
