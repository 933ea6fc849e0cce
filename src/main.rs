use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use volume_viewer::cli::Cli;
use volume_viewer::config::{ViewerConfig, WindowConfig};
use volume_viewer::core::{is_quit_key, EguiFrame, FrameClock, SurfaceRenderer};
use volume_viewer::viewer::Viewer;
use volume_viewer::volume::load_raw;

/// Window-bound state, created once the event loop resumes
struct Display {
    window: Arc<Window>,
    surface: SurfaceRenderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
}

impl Display {
    fn new(event_loop: &ActiveEventLoop, config: &WindowConfig, viewer: &Viewer) -> Result<Self> {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(config.title.as_str())
                        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height)),
                )
                .context("Failed to create window")?,
        );

        let framebuffer = viewer.framebuffer();
        let surface = SurfaceRenderer::new(window.clone(), framebuffer.width(), framebuffer.height())?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        Ok(Self {
            window,
            surface,
            egui_ctx,
            egui_state,
        })
    }
}

struct App {
    config: ViewerConfig,
    viewer: Viewer,
    display: Option<Display>,
    clock: FrameClock,
}

impl App {
    fn new(config: ViewerConfig, viewer: Viewer) -> Self {
        Self {
            config,
            viewer,
            display: None,
            clock: FrameClock::new(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        let delta = self.clock.delta();
        if self.viewer.frame(delta) {
            let framebuffer = self.viewer.framebuffer();
            let pixels = framebuffer.to_rgba8();
            if let Err(e) = display
                .surface
                .upload(&pixels, framebuffer.width(), framebuffer.height())
            {
                error!("Upload failed: {:#}", e);
            }
        }

        let raw_input = display.egui_state.take_egui_input(&display.window);
        let viewer = &mut self.viewer;
        let full_output = display.egui_ctx.run(raw_input, |ctx| viewer.ui(ctx));
        display
            .egui_state
            .handle_platform_output(&display.window, full_output.platform_output);
        let primitives = display
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let frame = EguiFrame {
            primitives: &primitives,
            textures: &full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };
        match display.surface.present(Some(frame)) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => display.surface.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("Surface error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return;
        }

        match Display::new(event_loop, &self.config.window, &self.viewer) {
            Ok(display) => {
                let size = display.window.inner_size();
                self.viewer.resize(size.width, size.height);
                self.display = Some(display);
            }
            Err(e) => {
                error!("Failed to initialize display: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // egui sees the event first
        if let Some(display) = self.display.as_mut() {
            if display.egui_state.on_window_event(&display.window, &event).consumed {
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event: key, .. } if is_quit_key(key) => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(display) = self.display.as_mut() {
                    display.surface.resize(size.width, size.height);
                }
                self.viewer.handle_window_event(&event);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => self.viewer.handle_window_event(&event),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(display) = &self.display {
            display.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let volume = load_raw(&cli.file, cli.dtype, cli.dims())
        .with_context(|| format!("Failed to load volume {}", cli.file.display()))?;
    let viewer = Viewer::new(volume, &config);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, viewer);

    info!("Controls: left drag rotates, right drag pans, wheel zooms, R resets, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
