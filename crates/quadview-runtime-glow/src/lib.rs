//! quadview runtime (glow/OpenGL backend)
//
// This crate contains only the rendering pipeline:
// - compile/link the quad program and resolve its inputs
// - upload the quad's vertex streams and the image texture
// - draw one frame given a Transform
// - the surface lifecycle adapter a host drives
//
// It does NOT contain windowing, GL context creation, image decoding or config files.
#![allow(clippy::missing_safety_doc)]

pub mod backend;
pub mod program;
pub mod quad;
pub mod renderer;
pub mod surface;
pub mod texture;

#[cfg(test)]
mod fake;

pub use backend::GlBackend;
pub use program::{
    compile_program, ProgramHandles, ShaderBindings, ShaderProgram, ShaderSource, QUAD_FRAG,
    QUAD_VERT,
};
pub use quad::QuadBuffers;
pub use renderer::{FrameOutcome, FrameRenderer, RendererOptions, SkipReason};
pub use surface::{ImageSurface, SurfaceRenderer};
pub use texture::{upload_texture, TextureUploader};

pub use quadview_core::EngineError;
