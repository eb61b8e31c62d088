//! Surface lifecycle: the callbacks a host drives, and the adapter that turns them into
//! renderer calls.
//!
//! Call order a host must follow:
//! 1. `on_surface_created` once (again only after `on_surface_destroyed`)
//! 2. `on_surface_changed` on every size change, at least once before the first draw
//! 3. `on_draw_frame` per redraw, any number of times
//! 4. `on_surface_destroyed` before the context goes away

use std::fmt;

use quadview_core::{compute_transform_with, EngineError, Image, Transform};
use tracing::{info, warn};

use crate::backend::GlBackend;
use crate::renderer::{FrameOutcome, FrameRenderer, RendererOptions, SkipReason};

pub trait SurfaceRenderer<G: GlBackend> {
    /// Creates GL objects. An error leaves the renderer unusable and must abort the host.
    unsafe fn on_surface_created(&mut self, gl: &G) -> Result<(), EngineError>;

    /// Sets the viewport and recomputes the transform.
    unsafe fn on_surface_changed(&mut self, gl: &G, width: i32, height: i32)
        -> Result<(), EngineError>;

    unsafe fn on_draw_frame(&mut self, gl: &G) -> FrameOutcome;

    /// Releases every GL object. Safe to call more than once.
    unsafe fn on_surface_destroyed(&mut self, gl: &G);
}

/// Shows one image, letterboxed per [`RendererOptions::aspect_policy`].
///
/// The current [`Transform`] is a value replaced wholesale on each size change and handed
/// to the renderer by reference on each draw.
pub struct ImageSurface<G: GlBackend> {
    options: RendererOptions,
    image: Option<Image>,
    renderer: Option<FrameRenderer<G>>,
    size: Option<(i32, i32)>,
    transform: Option<Transform>,
    last_skip: Option<SkipReason>,
}

impl<G: GlBackend> fmt::Debug for ImageSurface<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSurface")
            .field("image", &self.image.as_ref().map(|i| i.size()))
            .field("renderer", &self.renderer)
            .field("size", &self.size)
            .field("transform", &self.transform.map(|t| t.extents))
            .finish()
    }
}

impl<G: GlBackend> ImageSurface<G> {
    pub fn new(image: Image, options: RendererOptions) -> Self {
        Self {
            options,
            image: Some(image),
            renderer: None,
            size: None,
            transform: None,
            last_skip: None,
        }
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    pub fn renderer(&self) -> Option<&FrameRenderer<G>> {
        self.renderer.as_ref()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Swaps in a new image and refits the transform to its aspect ratio.
    pub fn set_image(&mut self, image: Image) -> Result<(), EngineError> {
        if let Some(r) = self.renderer.as_mut() {
            r.set_image(image.clone());
        }
        self.image = Some(image);
        self.refit()
    }

    /// Drops the image; frames are skipped until a new one is set.
    pub unsafe fn release_image(&mut self, gl: &G) {
        if let Some(r) = self.renderer.as_mut() {
            r.release_image(gl);
        }
        self.image = None;
        self.transform = None;
    }

    fn refit(&mut self) -> Result<(), EngineError> {
        let (Some((w, h)), Some(image)) = (self.size, self.image.as_ref()) else {
            return Ok(());
        };
        let transform =
            compute_transform_with(self.options.aspect_policy, w, h, image.width(), image.height())?;
        info!(
            width = w,
            height = h,
            half_width = transform.extents.half_width,
            half_height = transform.extents.half_height,
            "transform updated"
        );
        self.transform = Some(transform);
        Ok(())
    }

    fn note_outcome(&mut self, outcome: FrameOutcome) {
        let skip = match outcome {
            FrameOutcome::Drawn => None,
            FrameOutcome::Skipped(reason) => Some(reason),
        };
        if skip != self.last_skip {
            if let Some(reason) = skip {
                warn!(?reason, "skipping frames");
            } else {
                info!("drawing resumed");
            }
            self.last_skip = skip;
        }
    }
}

impl<G: GlBackend> SurfaceRenderer<G> for ImageSurface<G> {
    unsafe fn on_surface_created(&mut self, gl: &G) -> Result<(), EngineError> {
        // A recreated surface means the old context is gone; drop stale objects first.
        self.on_surface_destroyed(gl);
        let renderer = FrameRenderer::new(gl, self.image.clone(), &self.options)?;
        self.renderer = Some(renderer);
        info!("surface created");
        Ok(())
    }

    unsafe fn on_surface_changed(
        &mut self,
        gl: &G,
        width: i32,
        height: i32,
    ) -> Result<(), EngineError> {
        if width <= 0 || height <= 0 {
            let (image_width, image_height) = self.image.as_ref().map_or((0, 0), |i| i.size());
            return Err(EngineError::DegenerateProjection {
                surface_width: width.into(),
                surface_height: height.into(),
                image_width: image_width.into(),
                image_height: image_height.into(),
            });
        }
        let previous = self.size;
        self.size = Some((width, height));
        if let Err(e) = self.refit() {
            // keep drawing with the last good size
            self.size = previous;
            return Err(e);
        }
        gl.viewport(0, 0, width, height);
        Ok(())
    }

    unsafe fn on_draw_frame(&mut self, gl: &G) -> FrameOutcome {
        let outcome = match (self.renderer.as_mut(), self.transform.as_ref()) {
            (None, _) => FrameOutcome::Skipped(SkipReason::NotCreated),
            (Some(r), _) if r.image().is_none() => {
                r.clear(gl);
                FrameOutcome::Skipped(SkipReason::NoImage)
            }
            (Some(_), None) => FrameOutcome::Skipped(SkipReason::SurfaceNotSized),
            (Some(r), Some(t)) => r.draw(gl, t),
        };
        self.note_outcome(outcome);
        outcome
    }

    unsafe fn on_surface_destroyed(&mut self, gl: &G) {
        if let Some(r) = self.renderer.take() {
            r.destroy(gl);
            info!("surface destroyed");
        }
        self.last_skip = None;
    }
}
