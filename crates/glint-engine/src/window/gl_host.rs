use std::ffi::CStr;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail, ensure};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::{Driver, GlowDriver};

use super::host::{WindowConfig, WindowHost};

/// Pumps `create_window` allows for the platform to deliver `resumed`.
const CREATE_PUMP_LIMIT: usize = 100;
const CREATE_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Window plus its GL surface and current context.
///
/// Field order is drop order: surface and context go before the window.
struct GlWindow {
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    fn create(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;
        let window = window.context("platform returned no window")?;

        let (major, minor) = config.gl_version;
        let raw_handle = window.window_handle().ok().map(|h| h.as_raw());
        let context_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(raw_handle);

        let display = gl_config.display();
        let not_current = unsafe { display.create_context(&gl_config, &context_attrs) }
            .with_context(|| format!("failed to create an OpenGL {major}.{minor} core context"))?;

        let surface_attrs = window
            .build_surface_attributes(Default::default())
            .context("failed to describe the window surface")?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
            .context("failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make the GL context current")?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("failed to set swap interval: {e}");
        }

        Ok(Self {
            surface,
            context,
            window,
        })
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .max_by_key(|c| c.num_samples())
        .expect("glutin only calls the picker with a non-empty config list")
}

/// Event-loop side of the host.
struct HostState {
    config: WindowConfig,
    window: Option<GlWindow>,
    failure: Option<anyhow::Error>,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

impl ApplicationHandler for HostState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        match GlWindow::create(event_loop, &self.config) {
            Ok(w) => self.window = Some(w),
            Err(e) => self.failure = Some(e),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gl_window) = self.window.as_ref().filter(|w| w.window.id() == window_id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => {
                // The surface cannot be resized to zero (minimized window).
                if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                    gl_window.surface.resize(&gl_window.context, w, h);
                    self.resized = Some(size);
                }
            }
            _ => {}
        }
    }
}

/// [`WindowHost`] backed by winit and glutin.
///
/// Events are pumped on demand (`poll_events`) instead of handing control to
/// the event loop, so the caller owns the frame loop.
pub struct GlWindowHost {
    state: HostState,
    event_loop: EventLoop<()>,
}

impl GlWindowHost {
    /// Initializes the platform windowing system.
    pub fn init() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to initialize the windowing system")?;
        Ok(Self {
            state: HostState {
                config: WindowConfig::default(),
                window: None,
                failure: None,
                close_requested: false,
                resized: None,
            },
            event_loop,
        })
    }

    /// Opens the window and makes its GL context current on this thread.
    pub fn create_window(&mut self, config: &WindowConfig) -> Result<()> {
        ensure!(self.state.window.is_none(), "window already created");
        self.state.config = config.clone();

        for _ in 0..CREATE_PUMP_LIMIT {
            let status = self
                .event_loop
                .pump_app_events(Some(CREATE_PUMP_TIMEOUT), &mut self.state);

            if let Some(e) = self.state.failure.take() {
                return Err(e);
            }
            if self.state.window.is_some() {
                log::info!(
                    "created window \"{}\" ({}x{}, GL {}.{} core)",
                    config.title,
                    config.width,
                    config.height,
                    config.gl_version.0,
                    config.gl_version.1
                );
                return Ok(());
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before the window was created");
            }
        }

        bail!("platform did not resume within {CREATE_PUMP_LIMIT} event pumps")
    }

    /// Loads GL entry points for the current context.
    pub fn load_driver(&self) -> Result<GlowDriver> {
        let gl_window = self
            .state
            .window
            .as_ref()
            .context("no window; call create_window first")?;
        let display = gl_window.context.display();

        ensure!(
            !display.get_proc_address(c"glGetString").is_null(),
            "GL loader could not resolve glGetString"
        );

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name: &CStr| display.get_proc_address(name))
        };
        let driver = GlowDriver::new(gl);

        let version = driver.get_string(glow::VERSION);
        ensure!(!version.is_empty(), "GL entry points did not load (empty GL_VERSION)");

        log::info!("OpenGL version: {version}");
        log::info!("OpenGL renderer: {}", driver.get_string(glow::RENDERER));
        log::info!("GLSL version: {}", driver.get_string(glow::SHADING_LANGUAGE_VERSION));

        Ok(driver)
    }

    fn window(&self) -> Option<&GlWindow> {
        self.state.window.as_ref()
    }
}

impl WindowHost for GlWindowHost {
    fn should_close(&self) -> bool {
        self.state.close_requested
    }

    fn swap_buffers(&mut self) -> Result<()> {
        let Some(w) = self.window() else { bail!("no window to present to") };
        w.window.pre_present_notify();
        w.surface
            .swap_buffers(&w.context)
            .context("failed to swap buffers")
    }

    fn poll_events(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.state.close_requested = true;
        }
    }

    fn window_position(&self) -> Option<(i32, i32)> {
        let pos = self.window()?.window.outer_position().ok()?;
        Some((pos.x, pos.y))
    }

    fn set_window_position(&mut self, x: i32, y: i32) {
        if let Some(w) = self.window() {
            w.window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.state.resized.take().map(|s| (s.width, s.height))
    }

    fn terminate(&mut self) {
        if self.state.window.take().is_some() {
            log::debug!("window and GL context released");
        }
    }
}
