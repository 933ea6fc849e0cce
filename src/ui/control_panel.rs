//! Control panel: render mode, iso-value, sampling and camera readout.

use egui::{ComboBox, DragValue, Slider, Ui};

use crate::camera::CameraPose;
use crate::render::RenderMode;
use crate::volume::ValueRange;

/// A request made through the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    SetRenderMode(RenderMode),
    SetIsoValue(f32),
    SetSamplesPerPixel(u32),
    ResetCamera,
}

/// Read-only values shown by the panel
#[derive(Debug, Clone, Copy)]
pub struct PanelStats {
    pub fps: f32,
    pub accumulated_frames: u32,
    pub pose: CameraPose,
    pub value_range: ValueRange,
    /// Voxels under the current iso-value
    pub voxels_below_iso: usize,
}

/// Editable copies of the viewer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPanel {
    pub mode: RenderMode,
    pub iso_value: f32,
    pub samples_per_pixel: u32,
}

impl ControlPanel {
    pub fn new(mode: RenderMode, iso_value: f32, samples_per_pixel: u32) -> Self {
        Self {
            mode,
            iso_value,
            samples_per_pixel,
        }
    }

    /// Draw the panel and collect the edits made this frame
    pub fn draw(&mut self, ui: &mut Ui, stats: &PanelStats) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        let mut mode = self.mode;
        ComboBox::from_label("Render mode")
            .selected_text(mode.name())
            .show_ui(ui, |ui| {
                for option in [RenderMode::Volume, RenderMode::Isosurface] {
                    ui.selectable_value(&mut mode, option, option.name());
                }
            });
        if mode != self.mode {
            self.mode = mode;
            actions.push(PanelAction::SetRenderMode(mode));
        }

        let range = stats.value_range;
        let (low, high) = if range.is_empty() { (0.0, 1.0) } else { (range.low, range.high) };
        if ui
            .add_enabled(
                self.mode == RenderMode::Isosurface,
                Slider::new(&mut self.iso_value, low..=high).text("Iso-value"),
            )
            .changed()
        {
            actions.push(PanelAction::SetIsoValue(self.iso_value));
        }
        ui.label(format!("Voxels below iso-value: {}", stats.voxels_below_iso));

        ui.horizontal(|ui| {
            ui.label("Samples per pixel");
            if ui
                .add(DragValue::new(&mut self.samples_per_pixel).range(1..=256))
                .changed()
            {
                actions.push(PanelAction::SetSamplesPerPixel(self.samples_per_pixel));
            }
        });

        ui.separator();
        ui.label(format!(
            "Frames: {}/{}   FPS: {:.1}",
            stats.accumulated_frames, self.samples_per_pixel, stats.fps
        ));
        ui.label(format!("Range: [{:.3}, {:.3}]", low, high));

        ui.separator();
        let pose = &stats.pose;
        ui.monospace(format!("eye  {:>8.2} {:>8.2} {:>8.2}", pose.eye.x, pose.eye.y, pose.eye.z));
        ui.monospace(format!("look {:>8.3} {:>8.3} {:>8.3}", pose.look.x, pose.look.y, pose.look.z));
        ui.monospace(format!("up   {:>8.3} {:>8.3} {:>8.3}", pose.up.x, pose.up.y, pose.up.z));
        if ui.button("Reset camera (R)").clicked() {
            actions.push(PanelAction::ResetCamera);
        }

        actions
    }
}
