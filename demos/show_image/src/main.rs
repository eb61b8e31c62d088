// demos/show_image/src/main.rs
//
// Shows one image letterboxed in a window.
//
//   show_image <config.json>    load settings (and the image path) from a config file
//   show_image <image-file>     show the image with default settings
//
// RUST_LOG controls log output (default: info).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quadview_core::{load_viewer_config_from, ViewerConfig};
use quadview_host_winit as host;
use quadview_runtime_glow::{ImageSurface, RendererOptions};

fn load_config(arg: &Path) -> Result<ViewerConfig> {
    let is_json = arg
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_viewer_config_from(arg).with_context(|| format!("loading {}", arg.display()))
    } else {
        Ok(ViewerConfig::for_image(arg))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(arg) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: show_image <config.json | image-file>");
    };

    let cfg = load_config(&arg)?;
    let image = host::load_image(&cfg.image)
        .with_context(|| format!("loading image {}", cfg.image.display()))?;
    info!(
        image = %cfg.image.display(),
        width = image.width(),
        height = image.height(),
        "image loaded"
    );

    let options = RendererOptions::from_config(&cfg)?;
    let surface = ImageSurface::<glow::Context>::new(image, options);

    host::run(&cfg.window, surface)?;
    Ok(())
}
