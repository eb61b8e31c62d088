use std::fmt;

use quadview_core::{EngineError, Image, ImageId, UploadPolicy};
use tracing::debug;

use crate::backend::GlBackend;

/// Allocates a texture and uploads `image` into it.
///
/// Sampling: nearest when minifying, linear when magnifying, clamp-to-edge on both axes.
pub unsafe fn upload_texture<G: GlBackend>(gl: &G, image: &Image) -> Result<G::Texture, EngineError> {
    let tex = gl
        .create_texture()
        .map_err(|e| EngineError::GlCreate(format!("create_texture failed: {e}")))?;

    gl.bind_texture(Some(tex));
    gl.tex_parameter_i32(glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
    gl.tex_parameter_i32(glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
    gl.tex_parameter_i32(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
    gl.tex_parameter_i32(glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);

    // RGB8 rows are not 4-byte aligned for most widths.
    gl.unpack_alignment(1);
    gl.tex_image_2d(
        image.width() as i32,
        image.height() as i32,
        image.format(),
        image.pixels(),
    );

    Ok(tex)
}

/// Single-entry texture cache keyed by [`ImageId`].
pub struct TextureUploader<G: GlBackend> {
    policy: UploadPolicy,
    cached: Option<(ImageId, G::Texture)>,
    uploads: u64,
}

impl<G: GlBackend> fmt::Debug for TextureUploader<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureUploader")
            .field("policy", &self.policy)
            .field("cached", &self.cached)
            .field("uploads", &self.uploads)
            .finish()
    }
}

impl<G: GlBackend> TextureUploader<G> {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            cached: None,
            uploads: 0,
        }
    }

    pub fn policy(&self) -> UploadPolicy {
        self.policy
    }

    /// Number of uploads performed so far.
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    pub fn cached_image(&self) -> Option<ImageId> {
        self.cached.map(|(id, _)| id)
    }

    /// Returns a texture holding `image`, uploading only when the policy requires it.
    ///
    /// The previous texture is deleted before a replacement is created, so at most one
    /// texture is alive at any time.
    pub unsafe fn texture_for(&mut self, gl: &G, image: &Image) -> Result<G::Texture, EngineError> {
        if let (UploadPolicy::Cached, Some((id, tex))) = (self.policy, self.cached) {
            if id == image.id() {
                return Ok(tex);
            }
        }

        self.invalidate(gl);
        let tex = upload_texture(gl, image)?;
        self.cached = Some((image.id(), tex));
        self.uploads += 1;
        debug!(
            image = image.id().get(),
            width = image.width(),
            height = image.height(),
            uploads = self.uploads,
            "uploaded image texture"
        );
        Ok(tex)
    }

    /// Deletes the cached texture, if any.
    pub unsafe fn invalidate(&mut self, gl: &G) {
        if let Some((_, tex)) = self.cached.take() {
            gl.delete_texture(tex);
        }
    }

    pub unsafe fn destroy(&mut self, gl: &G) {
        self.invalidate(gl);
    }
}
