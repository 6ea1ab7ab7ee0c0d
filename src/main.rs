use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::Context as _;
use glutin::config::ConfigTemplate;
use glutin::context::{ContextAttributesBuilder, PossiblyCurrentContext};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use winit::window::{Window, WindowId};

use glquad::{debug, logging, parse_shader, AppConfig, GlDriver, QuadScene};

#[cfg(target_os = "windows")]
fn api_preference(window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Wgl(Some(window_handle))
}

#[cfg(target_os = "macos")]
fn api_preference(_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn api_preference(_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}

/// Everything tied to the window's GL context.
struct Graphics {
    // Dropped first, while the context below is still current.
    scene: QuadScene<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = event_loop
            .create_window(attributes)
            .context("failed to create window")?;

        // Get platform-specific handles to the display and window
        let display_handle = window.display_handle()?.as_raw();
        let window_handle = window.window_handle()?.as_raw();

        let display = unsafe { Display::new(display_handle, api_preference(window_handle)) }
            .context("failed to create GL display")?;

        let config_template = ConfigTemplate::default();
        let gl_config = unsafe { display.find_configs(config_template) }?
            .next()
            .context("no suitable GL config")?;

        let physical_size = window.inner_size();
        let width = NonZeroU32::new(physical_size.width).context("window has zero width")?;
        let height = NonZeroU32::new(physical_size.height).context("window has zero height")?;

        let surface_attributes =
            SurfaceAttributesBuilder::<WindowSurface>::new().build(window_handle, width, height);
        let context_attributes = ContextAttributesBuilder::new().build(Some(window_handle));

        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create window surface")?;
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .context("failed to create GL context")?;
        let context = not_current.make_current(&surface)?;

        let interval = match NonZeroU32::new(config.swap_interval) {
            Some(frames) => SwapInterval::Wait(frames),
            None => SwapInterval::DontWait,
        };
        if let Err(err) = surface.set_swap_interval(&context, interval) {
            tracing::warn!(%err, "could not set swap interval");
        }

        let gl = unsafe {
            Arc::new(glow::Context::from_loader_function(|symbol| {
                match CString::new(symbol) {
                    Ok(symbol) => display.get_proc_address(&symbol),
                    Err(_) => std::ptr::null(),
                }
            }))
        };
        tracing::info!(version = %gl.version_string(), "OpenGL context ready");

        tracing::info!(path = %config.shader_path.display(), "loading shader");
        let source = parse_shader(&config.shader_path)?;
        let scene = QuadScene::new(gl, &source, config.color_step)?;
        scene.resize(physical_size.width, physical_size.height)?;

        Ok(Self {
            scene,
            surface,
            context,
            window,
        })
    }

    fn resize(&self, width: u32, height: u32) -> anyhow::Result<()> {
        // Minimised windows report a zero size.
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Ok(());
        };
        self.surface.resize(&self.context, w, h);
        self.scene.resize(width, height)?;
        Ok(())
    }

    fn draw_frame(&mut self) -> anyhow::Result<()> {
        self.scene.render()?;
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

struct App {
    config: AppConfig,
    graphics: Option<Graphics>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            graphics: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.config) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };

        let result = match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested; stopping");
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => graphics.resize(size.width, size.height),
            WindowEvent::RedrawRequested => graphics.draw_frame().map(|()| {
                graphics.window.request_redraw();
            }),
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.take() {
            tracing::debug!("releasing GPU resources");
            drop(graphics);
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let config = AppConfig::from_args(std::env::args_os()).unwrap_or_else(|err| err.exit());
    debug::set_break_on_error(config.break_on_gl_error);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
