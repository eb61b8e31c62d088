//! Host glue (policy layer).
//!
//! Creates a winit window with a glutin GL context and drives a [`SurfaceRenderer`]
//! through its lifecycle. Kept separate so the runtime stays embed-friendly.

use std::ffi::CString;
use std::num::NonZeroU32;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{
    ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor, PossiblyCurrentContext,
};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::{GlConfig, GlDisplay, GlSurface};
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use quadview_core::{EngineError, WindowConfig};
use quadview_runtime_glow::SurfaceRenderer;

pub mod assets;

pub use assets::load_image;

/// A window with a current GL context.
pub struct GlWindow {
    pub window: Window,
    pub surface: Surface<WindowSurface>,
    pub context: PossiblyCurrentContext,
    pub gl: glow::Context,
}

impl std::fmt::Debug for GlWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlWindow")
            .field("window", &self.window.id())
            .field("size", &self.window.inner_size())
            .finish()
    }
}

fn host_err(what: &str, e: impl std::fmt::Display) -> EngineError {
    EngineError::Host(format!("{what}: {e}"))
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v.max(1)).unwrap_or(NonZeroU32::MIN)
}

/// Keeps the candidate with the highest `score`; an empty candidate list is a host error.
fn pick_best<T>(
    candidates: impl Iterator<Item = T>,
    score: impl Fn(&T) -> u8,
) -> Result<T, EngineError> {
    candidates
        .reduce(|a, b| if score(&a) >= score(&b) { a } else { b })
        .ok_or_else(|| EngineError::Host("no GL config matches the requested template".into()))
}

#[cfg(target_os = "windows")]
fn display_preference() -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(None)
}

#[cfg(target_os = "macos")]
fn display_preference() -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference() -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

pub fn make_gl(event_loop: &EventLoop<()>, cfg: &WindowConfig) -> Result<GlWindow, EngineError> {
    let template = ConfigTemplateBuilder::new()
        .with_alpha_size(8)
        .with_depth_size(24)
        .build();

    let gl_display = unsafe { Display::new(event_loop.raw_display_handle(), display_preference()) }
        .map_err(|e| host_err("display", e))?;
    let configs = unsafe { gl_display.find_configs(template) }
        .map_err(|e| host_err("find_configs", e))?;
    let gl_config = pick_best(configs, |c| c.num_samples())?;

    let builder = WindowBuilder::new()
        .with_title(cfg.title.as_str())
        .with_inner_size(PhysicalSize::new(cfg.width, cfg.height));
    let window = glutin_winit::finalize_window(event_loop, builder, &gl_config)
        .map_err(|e| host_err("window", e))?;

    let raw_window_handle = window.raw_window_handle();

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .map_err(|e| host_err("create_context", e))?;

    let size = window.inner_size();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        non_zero(size.width),
        non_zero(size.height),
    );
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .map_err(|e| host_err("create_window_surface", e))?;

    let context = not_current
        .make_current(&surface)
        .map_err(|e| host_err("make_current", e))?;

    let gl = unsafe {
        glow::Context::from_loader_function(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(&name) as *const _,
            Err(_) => std::ptr::null(),
        })
    };

    info!(width = size.width, height = size.height, "GL context ready");
    Ok(GlWindow {
        window,
        surface,
        context,
        gl,
    })
}

/// Opens a window and drives `renderer` until the window closes.
///
/// Surface creation and the first size change happen before the loop starts, so their
/// errors are returned. Once the loop runs this function does not return.
pub fn run<R>(cfg: &WindowConfig, mut renderer: R) -> Result<(), EngineError>
where
    R: SurfaceRenderer<glow::Context> + 'static,
{
    let event_loop = EventLoop::new();
    let GlWindow {
        window,
        surface,
        context,
        gl,
    } = make_gl(&event_loop, cfg)?;

    unsafe { renderer.on_surface_created(&gl) }?;
    let size = window.inner_size();
    unsafe { renderer.on_surface_changed(&gl, size.width as i32, size.height as i32) }?;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    unsafe { renderer.on_surface_destroyed(&gl) };
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if size.width == 0 || size.height == 0 {
                        debug!("surface minimized, keeping previous transform");
                        return;
                    }
                    surface.resize(&context, non_zero(size.width), non_zero(size.height));
                    let changed = unsafe {
                        renderer.on_surface_changed(&gl, size.width as i32, size.height as i32)
                    };
                    if let Err(err) = changed {
                        warn!(%err, "resize rejected");
                    }
                    window.request_redraw();
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let outcome = unsafe { renderer.on_draw_frame(&gl) };
                if outcome.presents() {
                    if let Err(err) = surface.swap_buffers(&context) {
                        error!(%err, "swap_buffers failed");
                        unsafe { renderer.on_surface_destroyed(&gl) };
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
            _ => {}
        }
    });
}
