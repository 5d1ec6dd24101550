//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and [`run_with_config`] to start the event loop.
//!
//! Initialization follows the backdrop's silent-abort contract: if the window
//! or a compatible GPU cannot be acquired, the backdrop is simply never built.
//! No error surfaces to the user and the event loop keeps running.

use std::sync::Arc;

use stardrift_config::Config;
use stardrift_render::{
    FrameEncoder, RenderContext, RenderPassBuilder, SurfaceError, SurfaceWrapper,
    init_render_context_blocking,
};
use stardrift_scene::SpaceBackdrop;
use tracing::{debug, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::frame_loop::FrameLoop;

/// Default window width in logical pixels.
pub const DEFAULT_WIDTH: f64 = 1280.0;
/// Default window height in logical pixels.
pub const DEFAULT_HEIGHT: f64 = 720.0;
/// Default window title.
pub const DEFAULT_TITLE: &str = "Stardrift";

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_transparent(true)
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Returns the default [`WindowAttributes`] for the backdrop window.
pub fn default_window_attributes() -> WindowAttributes {
    WindowAttributes::default()
        .with_title(DEFAULT_TITLE)
        .with_transparent(true)
        .with_inner_size(winit::dpi::LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
}

/// Application state that manages the window, GPU context, and the backdrop scene.
pub struct AppState {
    /// The window handle, wrapped in `Arc` for sharing with the renderer.
    pub window: Option<Arc<Window>>,
    /// GPU context owning device, queue, and surface. `None` when GPU
    /// acquisition failed — the backdrop silently does nothing.
    pub gpu: Option<RenderContext>,
    /// The backdrop scene. Built once in `resumed` when prerequisites hold.
    pub backdrop: Option<SpaceBackdrop>,
    /// Cross-platform surface wrapper that normalizes resize/DPI behavior
    /// and applies the pixel-density cap.
    pub surface_wrapper: SurfaceWrapper,
    /// The redraw loop: frame counter, wall clock, stop flag.
    pub frame_loop: FrameLoop,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState` with default configuration and no window.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new `AppState` from a [`Config`].
    pub fn with_config(config: Config) -> Self {
        let surface_wrapper = SurfaceWrapper::new(
            config.window.width,
            config.window.height,
            1.0,
            config.backdrop.pixel_ratio_cap,
        );

        Self {
            window: None,
            gpu: None,
            backdrop: None,
            surface_wrapper,
            frame_loop: FrameLoop::new(),
            config,
        }
    }

    /// Returns the current surface width in pixels.
    pub fn surface_width(&self) -> u32 {
        self.surface_wrapper.surface_width()
    }

    /// Returns the current surface height in pixels.
    pub fn surface_height(&self) -> u32 {
        self.surface_wrapper.surface_height()
    }

    /// Apply a surface size change to the GPU surface and camera.
    fn apply_resize(&mut self, event: stardrift_render::SurfaceResizeEvent) {
        let w = event.surface.width;
        let h = event.surface.height;

        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
        }
        if let Some(backdrop) = &mut self.backdrop {
            backdrop.resize(w as f32, h as f32);
        }

        info!(
            "Surface resized to {}x{} (scale: {:.2}, effective: {:.2})",
            w, h, event.scale_factor, event.effective_scale
        );
    }

    /// Render one frame: advance the animation, encode the backdrop pass,
    /// and present.
    ///
    /// A no-op when the GPU or backdrop is missing, by design: the backdrop
    /// either fully initializes and runs forever, or does nothing.
    pub fn render_frame(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let Some(backdrop) = &mut self.backdrop else {
            return;
        };

        let elapsed_ms = self.frame_loop.elapsed_millis();
        self.frame_loop.advance();
        backdrop.advance_and_upload(&gpu.queue, elapsed_ms);

        match gpu.get_current_texture() {
            Ok(surface_texture) => {
                let mut frame_encoder =
                    FrameEncoder::new(&gpu.device, Arc::new(gpu.queue.clone()), surface_texture);
                let pass_builder = RenderPassBuilder::new().label("backdrop-pass");
                {
                    let mut render_pass = frame_encoder.begin_render_pass(&pass_builder);
                    backdrop.draw(&mut render_pass);
                }
                frame_encoder.submit();

                if self.config.debug.log_frame_stats
                    && self.frame_loop.frame_count().is_multiple_of(600)
                {
                    info!(
                        "Frame {}: yaw={:.4} rad, camera z={:.3}",
                        self.frame_loop.frame_count(),
                        backdrop.state().star_yaw,
                        backdrop.camera().position.z,
                    );
                }
            }
            Err(SurfaceError::Timeout) => {
                debug!("Surface acquire timed out, skipping frame");
            }
            Err(e) => {
                warn!("Failed to acquire surface texture: {e}");
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = match event_loop.create_window(attrs) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    // Missing output surface: backdrop stays uninitialized.
                    debug!("Window creation failed, backdrop disabled: {e}");
                    return;
                }
            };

            let scale_factor = window.scale_factor();
            let inner_size = window.inner_size();
            self.surface_wrapper = SurfaceWrapper::new(
                inner_size.width,
                inner_size.height,
                scale_factor,
                self.config.backdrop.pixel_ratio_cap,
            );
            info!(
                "Surface wrapper initialized: {}x{} (scale: {:.2})",
                self.surface_width(),
                self.surface_height(),
                scale_factor
            );

            match init_render_context_blocking(window.clone()) {
                Ok(mut ctx) => {
                    // The context configures itself at the window's physical
                    // size; apply the pixel-density cap before first use.
                    ctx.resize(self.surface_width(), self.surface_height());
                    let backdrop = SpaceBackdrop::new(
                        &ctx.device,
                        ctx.surface_format,
                        &self.config.backdrop,
                        self.surface_wrapper.aspect_ratio(),
                    );
                    self.gpu = Some(ctx);
                    self.backdrop = Some(backdrop);
                    // Kick off the self-rescheduling redraw loop.
                    window.request_redraw();
                }
                Err(e) => {
                    // Missing rendering capability: backdrop stays
                    // uninitialized, the window keeps running empty and no
                    // redraw loop is started.
                    debug!("GPU initialization failed, backdrop disabled: {e}");
                }
            }

            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.frame_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    self.apply_resize(resize);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // Get the new physical size from the window after the scale change
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        new_inner.width,
                        new_inner.height,
                    ) {
                        self.apply_resize(resize);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.frame_loop.is_running() {
                    event_loop.exit();
                    return;
                }

                self.render_frame();

                // Self-reschedule: the loop runs until stopped.
                if self.backdrop.is_some()
                    && let Some(window) = &self.window
                {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the backdrop with default config.
///
/// This function blocks until the window is closed.
#[instrument]
pub fn run() {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AppState::new();
    event_loop.run_app(&mut app).expect("Event loop failed");
}

/// Creates an event loop and runs the backdrop with the given config.
///
/// This function blocks until the window is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
