use std::fmt;
use std::path::PathBuf;

/// Shader pipeline stage, used to tag compile failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Which kind of program input a name lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Attribute,
    Uniform,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Attribute => f.write_str("attribute"),
            HandleKind::Uniform => f.write_str("uniform"),
        }
    }
}

/// Engine-level errors used across quadview crates.
///
/// Lives in `quadview-core` and is re-exported by the runtime.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // ---- Config / assets ----
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("json parse error at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config at {}: {msg}", .path.display())]
    InvalidConfig { path: PathBuf, msg: String },

    #[error("failed to decode image {}: {msg}", .path.display())]
    ImageDecode { path: PathBuf, msg: String },

    // ---- Data model ----
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error(
        "degenerate projection input: surface {surface_width}x{surface_height}, image {image_width}x{image_height}"
    )]
    DegenerateProjection {
        surface_width: i64,
        surface_height: i64,
        image_width: i64,
        image_height: i64,
    },

    // ---- Runtime-facing (backend) ----
    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program link error: {0}")]
    ProgramLink(String),

    #[error("{kind} `{name}` not found in program")]
    HandleNotFound { kind: HandleKind, name: String },

    #[error("backend object creation failed: {0}")]
    GlCreate(String),

    // ---- Host ----
    #[error("host error: {0}")]
    Host(String),

    // ---- Fallback ----
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }

    /// True for errors that leave the pipeline unusable (surface creation must abort).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::ShaderCompile { .. }
                | EngineError::ProgramLink(_)
                | EngineError::GlCreate(_)
                | EngineError::Host(_)
        )
    }
}
