//! JSON configuration for the viewer.
//!
//! Only `image` is required; every other field has a default. Relative paths are
//! resolved against the directory containing the config file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::projection::AspectPolicy;
use crate::EngineError;

/// When the image texture is (re)uploaded to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPolicy {
    /// Upload once per image identity.
    #[default]
    Cached,
    /// Recreate and upload the texture on every frame.
    EveryFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Optional shader override files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vert: PathBuf,
    pub frag: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,

    /// Image file to display.
    pub image: PathBuf,

    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],

    #[serde(default)]
    pub upload_policy: UploadPolicy,

    #[serde(default)]
    pub aspect_policy: AspectPolicy,

    /// Treat unresolved attribute/uniform names as fatal.
    #[serde(default)]
    pub strict_bindings: bool,

    #[serde(default)]
    pub shaders: Option<ShaderPaths>,
}

fn default_title() -> String {
    "quadview".to_string()
}
fn default_width() -> u32 {
    960
}
fn default_height() -> u32 {
    540
}
fn default_clear_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl ViewerConfig {
    /// Config for showing `image` with every other setting at its default.
    pub fn for_image(image: impl Into<PathBuf>) -> Self {
        Self {
            window: WindowConfig::default(),
            image: image.into(),
            clear_color: default_clear_color(),
            upload_policy: UploadPolicy::default(),
            aspect_policy: AspectPolicy::default(),
            strict_bindings: false,
            shaders: None,
        }
    }

    /// Checks value ranges serde cannot express. `path` is only used for error context.
    pub fn validate(&self, path: &Path) -> Result<(), EngineError> {
        let invalid = |msg: String| EngineError::InvalidConfig {
            path: path.to_path_buf(),
            msg,
        };

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid(format!(
                "window size must be > 0 (got {}x{})",
                self.window.width, self.window.height
            )));
        }
        if self.image.as_os_str().is_empty() {
            return Err(invalid("image path is empty".into()));
        }
        if let Some(c) = self
            .clear_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(invalid(format!("clear_color component {c} outside [0, 1]")));
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        self.image = resolve(base, &self.image);
        if let Some(shaders) = self.shaders.as_mut() {
            shaders.vert = resolve(base, &shaders.vert);
            shaders.frag = resolve(base, &shaders.frag);
        }
    }
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Reads and deserializes any JSON file.
pub fn load_typed_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads, validates and path-resolves a [`ViewerConfig`].
pub fn load_viewer_config_from(path: &Path) -> Result<ViewerConfig, EngineError> {
    let mut cfg: ViewerConfig = load_typed_json(path)?;
    cfg.validate(path)?;
    if let Some(dir) = path.parent() {
        cfg.resolve_relative_to(dir);
    }
    debug!(config = %path.display(), image = %cfg.image.display(), "loaded viewer config");
    Ok(cfg)
}
