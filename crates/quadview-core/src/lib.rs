#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod image;
pub mod projection;

pub use error::{EngineError, HandleKind, ShaderStage};

pub use config::{
    load_typed_json, load_viewer_config_from, ShaderPaths, UploadPolicy, ViewerConfig,
    WindowConfig,
};
pub use geometry::{PackedBuffer, QuadGeometry, QUAD_POSITIONS, QUAD_TEX_COORDS};
pub use image::{Image, ImageId, PixelFormat};
pub use projection::{
    compute_transform, compute_transform_with, AspectPolicy, OrthoExtents, Transform,
};
