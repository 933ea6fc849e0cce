// viewer.rs - Camera, input, renderer and UI state of one window
use glam::Vec2;
use log::{debug, info};
use winit::event::WindowEvent;

use crate::camera::{ArcballCamera, CameraCommand, CameraPose};
use crate::config::ViewerConfig;
use crate::core::{ArcballController, DisplayContext, FpsCounter};
use crate::events::{EventQueue, ViewerEvent};
use crate::render::{FrameBuffer, RenderMode, RenderSettings, Renderer, VolumeRenderer};
use crate::ui::{ControlPanel, PanelAction, PanelStats, TransferFunctionWidget};
use crate::volume::Volume;

/// Everything behind the window except the GPU surface.
///
/// Input and UI push [`ViewerEvent`]s; [`Viewer::update`] drains them once per
/// frame before [`Viewer::render`] adds a sample to the framebuffer.
pub struct Viewer {
    camera: ArcballCamera,
    pose: CameraPose,
    controller: ArcballController,
    events: EventQueue,
    renderer: VolumeRenderer,
    framebuffer: FrameBuffer,
    tf_widget: TransferFunctionWidget,
    panel: ControlPanel,
    render_scale: f32,
    fps: FpsCounter,
    voxels_below_iso: usize,
}

impl Viewer {
    pub fn new(volume: Volume, config: &ViewerConfig) -> Self {
        let window = DisplayContext::new(config.window.width, config.window.height);
        let render_scale = config.render.render_scale.clamp(0.05, 1.0);
        let target = window.scaled(render_scale);

        let range = volume.range();
        let settings = RenderSettings::from_config(&config.render, range);
        let tf_widget = TransferFunctionWidget::new(config.transfer_function.preset);
        let transfer_function = tf_widget.transfer_function(range);

        let camera = ArcballCamera::with_config(volume.bounds(), window.aspect(), config.camera);
        let pose = camera.pose();
        let voxels_below_iso = volume.values_below(settings.iso_value).len();
        let panel = ControlPanel::new(settings.mode, settings.iso_value, settings.samples_per_pixel);

        info!(
            "Viewer {}x{} rendering at {}x{}, {:?} mode, iso {}",
            window.width, window.height, target.width, target.height, settings.mode, settings.iso_value
        );

        let mut viewer = Self {
            camera,
            pose,
            controller: ArcballController::new(window),
            events: EventQueue::new(),
            renderer: VolumeRenderer::new(volume, transfer_function, settings),
            framebuffer: FrameBuffer::new(target.width, target.height),
            tf_widget,
            panel,
            render_scale,
            fps: FpsCounter::default(),
            voxels_below_iso,
        };
        // the widget starts dirty; its first notification is already applied
        viewer.tf_widget.take_changed();
        viewer
    }

    pub fn camera(&self) -> &ArcballCamera {
        &self.camera
    }

    /// Pose handed to the renderer, refreshed when the camera changes
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn renderer(&self) -> &VolumeRenderer {
        &self.renderer
    }

    pub fn settings(&self) -> &RenderSettings {
        self.renderer.settings()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn transfer_function_widget_mut(&mut self) -> &mut TransferFunctionWidget {
        &mut self.tf_widget
    }

    /// Feed a window event through the input adapter
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized(size) = event {
            self.resize(size.width, size.height);
            return;
        }
        if let Some(command) = self.controller.process_event(event) {
            self.apply_command(command);
        }
    }

    /// Mutate the camera and schedule a pose refresh
    pub fn apply_command(&mut self, command: CameraCommand) {
        self.camera.apply(command);
        self.events.push(ViewerEvent::CameraChanged);
    }

    /// Convenience for headless drags in normalized device coordinates
    pub fn drag(&mut self, from: Vec2, to: Vec2) {
        self.apply_command(CameraCommand::Rotate { from, to });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.events.push(ViewerEvent::ViewportResized { width, height });
    }

    pub fn set_iso_value(&mut self, iso_value: f32) {
        self.panel.iso_value = iso_value;
        self.events.push(ViewerEvent::IsoValueChanged(iso_value));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.panel.mode = mode;
        self.events.push(ViewerEvent::RenderModeChanged);
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) {
        let mut settings = *self.renderer.settings();
        settings.samples_per_pixel = samples.max(1);
        self.panel.samples_per_pixel = settings.samples_per_pixel;
        self.renderer.set_settings(settings);
    }

    pub fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::SetRenderMode(mode) => self.set_render_mode(mode),
            PanelAction::SetIsoValue(value) => self.set_iso_value(value),
            PanelAction::SetSamplesPerPixel(samples) => self.set_samples_per_pixel(samples),
            PanelAction::ResetCamera => self.apply_command(CameraCommand::Reset),
        }
    }

    /// Drain pending events and apply them; returns what was handled
    pub fn update(&mut self) -> Vec<ViewerEvent> {
        if self.tf_widget.take_changed() {
            self.events.push(ViewerEvent::TransferFunctionChanged);
        }

        let events = self.events.drain();
        for event in &events {
            debug!("Applying {:?}", event);
            match *event {
                ViewerEvent::CameraChanged => {
                    self.pose = self.camera.pose();
                }
                ViewerEvent::TransferFunctionChanged => {
                    let range = self.renderer.volume().range();
                    self.renderer
                        .set_transfer_function(self.tf_widget.transfer_function(range));
                }
                ViewerEvent::IsoValueChanged(iso_value) => {
                    let mut settings = *self.renderer.settings();
                    settings.iso_value = iso_value;
                    self.renderer.set_settings(settings);
                    self.voxels_below_iso = self.renderer.volume().values_below(iso_value).len();
                }
                ViewerEvent::RenderModeChanged => {
                    let mut settings = *self.renderer.settings();
                    settings.mode = self.panel.mode;
                    self.renderer.set_settings(settings);
                }
                ViewerEvent::ViewportResized { width, height } => {
                    let window = DisplayContext::new(width, height);
                    self.controller.resize(window);
                    self.camera.update_screen(window.aspect());
                    self.pose = self.camera.pose();
                    let target = window.scaled(self.render_scale);
                    self.framebuffer.resize(target.width, target.height);
                }
            }
        }
        if !events.is_empty() {
            self.framebuffer.clear();
        }
        events
    }

    /// True while the framebuffer still needs samples
    pub fn needs_samples(&self) -> bool {
        self.framebuffer.frame_count() < self.renderer.settings().samples_per_pixel
    }

    /// Add one sample per pixel unless the image has converged
    pub fn render(&mut self) -> bool {
        if !self.needs_samples() {
            return false;
        }
        self.renderer.render_frame(&self.pose, &mut self.framebuffer);
        true
    }

    /// One frame of work: apply events, then render
    pub fn frame(&mut self, delta: f32) -> bool {
        if let Some(fps) = self.fps.tick(delta) {
            debug!("FPS: {:.1}", fps);
        }
        self.update();
        self.render()
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Draw the egui windows and queue what they changed
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("Transfer Function")
            .default_pos(egui::pos2(10.0, 10.0))
            .default_width(280.0)
            .show(ctx, |ui| {
                self.tf_widget.draw(ui);
            });

        let stats = PanelStats {
            fps: self.fps.fps(),
            accumulated_frames: self.framebuffer.frame_count(),
            pose: self.pose,
            value_range: self.renderer.volume().range(),
            voxels_below_iso: self.voxels_below_iso,
        };
        let mut actions = Vec::new();
        egui::Window::new("Control Panel")
            .default_pos(egui::pos2(10.0, 240.0))
            .show(ctx, |ui| {
                actions = self.panel.draw(ui, &stats);
            });
        for action in actions {
            self.apply_panel_action(action);
        }
    }
}
