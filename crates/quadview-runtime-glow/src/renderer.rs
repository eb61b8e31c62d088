use std::fmt;

use quadview_core::{
    AspectPolicy, EngineError, Image, QuadGeometry, Transform, UploadPolicy, ViewerConfig,
};
use tracing::{info, warn};

use crate::backend::GlBackend;
use crate::program::{ShaderBindings, ShaderProgram, ShaderSource};
use crate::quad::QuadBuffers;
use crate::texture::TextureUploader;

/// Everything the renderer needs that is fixed for a surface's lifetime.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    pub shaders: ShaderSource,
    pub bindings: ShaderBindings,
    pub upload_policy: UploadPolicy,
    pub aspect_policy: AspectPolicy,
    pub clear_color: [f32; 4],
    /// Fail surface creation when an attribute/uniform name does not resolve.
    pub strict_bindings: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            shaders: ShaderSource::builtin(),
            bindings: ShaderBindings::default(),
            upload_policy: UploadPolicy::default(),
            aspect_policy: AspectPolicy::default(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            strict_bindings: false,
        }
    }
}

impl RendererOptions {
    /// Reads shader override files named by the config.
    pub fn from_config(cfg: &ViewerConfig) -> Result<Self, EngineError> {
        Ok(Self {
            shaders: ShaderSource::load(cfg.shaders.as_ref())?,
            bindings: ShaderBindings::default(),
            upload_policy: cfg.upload_policy,
            aspect_policy: cfg.aspect_policy,
            clear_color: cfg.clear_color,
            strict_bindings: cfg.strict_bindings,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No image is held (never set, or released).
    NoImage,
    /// No transform yet: draw arrived before the first size change.
    SurfaceNotSized,
    /// Surface not created (or already destroyed).
    NotCreated,
    /// The texture could not be allocated this frame.
    TextureUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Skipped(SkipReason),
}

impl FrameOutcome {
    /// True when the back buffer holds a finished frame the host should swap in.
    ///
    /// A `NoImage` skip leaves a cleared buffer, which replaces the last image on screen.
    pub fn presents(self) -> bool {
        matches!(self, FrameOutcome::Drawn | FrameOutcome::Skipped(SkipReason::NoImage))
    }
}

/// Draws the image quad. Owns every GL object of the pipeline.
pub struct FrameRenderer<G: GlBackend> {
    program: ShaderProgram<G>,
    quad: QuadBuffers<G>,
    textures: TextureUploader<G>,
    image: Option<Image>,
    clear_color: [f32; 4],
}

impl<G: GlBackend> fmt::Debug for FrameRenderer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("program", &self.program)
            .field("quad", &self.quad)
            .field("textures", &self.textures)
            .field("image", &self.image.as_ref().map(|i| i.id()))
            .finish()
    }
}

impl<G: GlBackend> FrameRenderer<G> {
    /// Builds the program and uploads the quad. Shader and link failures are returned.
    pub unsafe fn new(
        gl: &G,
        image: Option<Image>,
        opts: &RendererOptions,
    ) -> Result<Self, EngineError> {
        let [r, g, b, a] = opts.clear_color;
        gl.clear_color(r, g, b, a);

        let program =
            ShaderProgram::build_with(gl, &opts.shaders.vert, &opts.shaders.frag, &opts.bindings)?;
        if opts.strict_bindings {
            if let Err(e) = program.require_all() {
                program.destroy(gl);
                return Err(e);
            }
        }

        let quad = match QuadBuffers::new(gl, &QuadGeometry::fullscreen()) {
            Ok(q) => q,
            Err(e) => {
                program.destroy(gl);
                return Err(e);
            }
        };

        info!(
            shaders = opts.shaders.origin.as_deref().unwrap_or("<inline>"),
            upload_policy = ?opts.upload_policy,
            "renderer created"
        );

        Ok(Self {
            program,
            quad,
            textures: TextureUploader::new(opts.upload_policy),
            image,
            clear_color: opts.clear_color,
        })
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn program(&self) -> &ShaderProgram<G> {
        &self.program
    }

    pub fn textures(&self) -> &TextureUploader<G> {
        &self.textures
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Replaces the image. The texture is refreshed on the next draw.
    pub fn set_image(&mut self, image: Image) {
        self.image = Some(image);
    }

    /// Drops the image and its texture; subsequent frames are skipped.
    pub unsafe fn release_image(&mut self, gl: &G) {
        self.image = None;
        self.textures.invalidate(gl);
    }

    /// Clears colour and depth to the configured clear colour.
    pub unsafe fn clear(&self, gl: &G) {
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }

    /// Renders one frame with `transform`.
    pub unsafe fn draw(&mut self, gl: &G, transform: &Transform) -> FrameOutcome {
        self.clear(gl);

        let Some(image) = self.image.as_ref() else {
            return FrameOutcome::Skipped(SkipReason::NoImage);
        };

        let handles = &self.program.handles;
        gl.use_program(Some(self.program.program));
        if let Some(loc) = &handles.mvp {
            gl.uniform_matrix_4(loc, &transform.mvp_cols());
        }
        self.quad.bind(gl, handles);
        if let Some(loc) = &handles.texture {
            gl.uniform_1_i32(loc, 0);
        }

        gl.active_texture(0);
        let tex = match self.textures.texture_for(gl, image) {
            Ok(tex) => tex,
            Err(err) => {
                warn!(%err, "texture unavailable, skipping frame");
                self.quad.unbind(gl);
                gl.use_program(None);
                return FrameOutcome::Skipped(SkipReason::TextureUnavailable);
            }
        };
        gl.bind_texture(Some(tex));

        gl.draw_arrays(glow::TRIANGLE_STRIP, 0, self.quad.vertex_count());

        self.quad.unbind(gl);
        gl.use_program(None);
        FrameOutcome::Drawn
    }

    /// Deletes every GL object this renderer created.
    pub unsafe fn destroy(mut self, gl: &G) {
        self.textures.destroy(gl);
        self.quad.destroy(gl);
        self.program.destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeGl};
    use quadview_core::{compute_transform, ShaderStage};

    fn image() -> Image {
        Image::from_rgba8(4, 2, vec![128; 32]).unwrap()
    }

    fn renderer(gl: &FakeGl, opts: &RendererOptions) -> FrameRenderer<FakeGl> {
        unsafe { FrameRenderer::new(gl, Some(image()), opts) }.unwrap()
    }

    #[test]
    fn draw_issues_strip_of_four() {
        let gl = FakeGl::new();
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        gl.take_calls();

        assert_eq!(unsafe { r.draw(&gl, &t) }, FrameOutcome::Drawn);
        let calls = gl.take_calls();

        assert_eq!(
            calls.first(),
            Some(&Call::Clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT))
        );
        assert!(calls.contains(&Call::UseProgram(Some(r.program().program))));
        assert!(calls.contains(&Call::UniformMatrix4 {
            location: 11,
            cols: t.mvp_cols()
        }));
        assert!(calls.contains(&Call::Uniform1i {
            location: 10,
            value: 0
        }));
        assert!(calls.contains(&Call::EnableVertexAttribArray(0)));
        assert!(calls.contains(&Call::EnableVertexAttribArray(1)));
        assert!(calls.contains(&Call::ActiveTexture(0)));

        let draws: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::DrawArrays { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![&Call::DrawArrays {
                mode: glow::TRIANGLE_STRIP,
                first: 0,
                count: 4
            }]
        );
    }

    #[test]
    fn released_image_skips_after_clear() {
        let gl = FakeGl::new();
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        unsafe { r.draw(&gl, &t) };
        unsafe { r.release_image(&gl) };
        assert_eq!(gl.live_textures(), 0);
        gl.take_calls();

        assert_eq!(
            unsafe { r.draw(&gl, &t) },
            FrameOutcome::Skipped(SkipReason::NoImage)
        );
        let calls = gl.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Call::Clear(_)));
    }

    #[test]
    fn only_drawn_and_cleared_frames_are_presented() {
        assert!(FrameOutcome::Drawn.presents());
        assert!(FrameOutcome::Skipped(SkipReason::NoImage).presents());
        for reason in [
            SkipReason::SurfaceNotSized,
            SkipReason::NotCreated,
            SkipReason::TextureUnavailable,
        ] {
            assert!(!FrameOutcome::Skipped(reason).presents(), "{reason:?}");
        }
    }

    #[test]
    fn cached_texture_survives_many_frames() {
        let gl = FakeGl::new();
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        for _ in 0..30 {
            unsafe { r.draw(&gl, &t) };
        }
        assert_eq!(r.textures().upload_count(), 1);

        r.set_image(image());
        unsafe { r.draw(&gl, &t) };
        assert_eq!(r.textures().upload_count(), 2);
        assert_eq!(gl.live_textures(), 1);
    }

    #[test]
    fn every_frame_policy_reuploads() {
        let gl = FakeGl::new();
        let opts = RendererOptions {
            upload_policy: UploadPolicy::EveryFrame,
            ..RendererOptions::default()
        };
        let mut r = renderer(&gl, &opts);
        let t = compute_transform(800, 600, 4, 2).unwrap();
        for _ in 0..3 {
            unsafe { r.draw(&gl, &t) };
        }
        assert_eq!(r.textures().upload_count(), 3);
        assert_eq!(gl.live_textures(), 1);
    }

    #[test]
    fn missing_mvp_renders_degraded() {
        let gl = FakeGl {
            missing_names: vec!["uMvp"],
            ..FakeGl::default()
        };
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        gl.take_calls();
        assert_eq!(unsafe { r.draw(&gl, &t) }, FrameOutcome::Drawn);
        assert_eq!(gl.count(|c| matches!(c, Call::UniformMatrix4 { .. })), 0);
    }

    #[test]
    fn strict_bindings_reject_missing_names() {
        let gl = FakeGl {
            missing_names: vec!["uTexture"],
            ..FakeGl::default()
        };
        let opts = RendererOptions {
            strict_bindings: true,
            ..RendererOptions::default()
        };
        let err = unsafe { FrameRenderer::new(&gl, Some(image()), &opts) }.unwrap_err();
        assert!(matches!(err, EngineError::HandleNotFound { .. }));
        assert!(gl.live.borrow().is_empty());
    }

    #[test]
    fn shader_failure_surfaces_from_new() {
        let gl = FakeGl {
            fail_compile: Some(ShaderStage::Fragment),
            ..FakeGl::default()
        };
        let err = unsafe { FrameRenderer::new(&gl, Some(image()), &RendererOptions::default()) }
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn texture_failure_skips_frame() {
        let gl = FakeGl {
            fail_texture_create: true,
            ..FakeGl::default()
        };
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        assert_eq!(
            unsafe { r.draw(&gl, &t) },
            FrameOutcome::Skipped(SkipReason::TextureUnavailable)
        );
        assert_eq!(gl.count(|c| matches!(c, Call::DrawArrays { .. })), 0);
    }

    #[test]
    fn destroy_releases_everything() {
        let gl = FakeGl::new();
        let mut r = renderer(&gl, &RendererOptions::default());
        let t = compute_transform(800, 600, 4, 2).unwrap();
        unsafe { r.draw(&gl, &t) };
        assert!(!gl.live.borrow().is_empty());
        unsafe { r.destroy(&gl) };
        assert!(gl.live.borrow().is_empty());
    }
}
