//! Transfer function editor: color map preset plus an editable opacity curve.

use egui::{Color32, ComboBox, Pos2, Rect, Sense, Stroke, Ui};
use glam::{Vec2, Vec3};

use crate::transfer_function::{ColorMap, TransferFunction};
use crate::volume::ValueRange;

/// Entries in the generated RGBA8 colormap
pub const COLORMAP_SIZE: usize = 256;
/// Pick distance for existing control points, in normalized units
const PICK_RADIUS: f32 = 0.04;
const CANVAS_HEIGHT: f32 = 120.0;
const GRADIENT_STRIPS: usize = 64;

/// Opacity curve editor.
///
/// Control points live in `[0, 1]²`, sorted by x. The first and last points
/// stay pinned at x = 0 and x = 1.
#[derive(Debug, Clone)]
pub struct TransferFunctionWidget {
    preset: ColorMap,
    points: Vec<Vec2>,
    selected: Option<usize>,
    changed: bool,
}

impl TransferFunctionWidget {
    pub fn new(preset: ColorMap) -> Self {
        Self {
            preset,
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)],
            selected: None,
            changed: true,
        }
    }

    pub fn preset(&self) -> ColorMap {
        self.preset
    }

    pub fn set_preset(&mut self, preset: ColorMap) {
        if preset != self.preset {
            self.preset = preset;
            self.changed = true;
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Returns true once after each edit
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Select the point under `pos`, or insert a new one there
    pub fn begin_drag(&mut self, pos: Vec2) {
        let pos = pos.clamp(Vec2::ZERO, Vec2::ONE);
        if let Some(i) = self.point_near(pos) {
            self.selected = Some(i);
            self.drag_to(pos);
            return;
        }
        let i = self
            .points
            .iter()
            .position(|p| p.x > pos.x)
            .unwrap_or(self.points.len() - 1)
            .max(1);
        self.points.insert(i, pos);
        self.selected = Some(i);
        self.changed = true;
    }

    /// Move the selected point; x stays between its neighbours
    pub fn drag_to(&mut self, pos: Vec2) {
        let Some(i) = self.selected else {
            return;
        };
        let last = self.points.len() - 1;
        let x = if i == 0 {
            0.0
        } else if i == last {
            1.0
        } else {
            pos.x.clamp(self.points[i - 1].x, self.points[i + 1].x)
        };
        let moved = Vec2::new(x, pos.y.clamp(0.0, 1.0));
        if moved != self.points[i] {
            self.points[i] = moved;
            self.changed = true;
        }
    }

    pub fn end_drag(&mut self) {
        self.selected = None;
    }

    /// Remove the interior point under `pos`; end points are kept
    pub fn remove_point_near(&mut self, pos: Vec2) -> bool {
        match self.point_near(pos) {
            Some(i) if i > 0 && i < self.points.len() - 1 => {
                self.points.remove(i);
                self.selected = None;
                self.changed = true;
                true
            }
            _ => false,
        }
    }

    /// Opacity of the curve at `x`
    pub fn opacity_at(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                let span = b.x - a.x;
                if span <= f32::EPSILON {
                    return b.y;
                }
                return a.y + (b.y - a.y) * (x - a.x) / span;
            }
        }
        self.points.last().map_or(0.0, |p| p.y)
    }

    /// Preset colors and curve opacities packed four bytes per entry
    pub fn colormap_rgba8(&self) -> Vec<u8> {
        let lookup = TransferFunction::new(self.preset.colors(), vec![1.0], ValueRange::new(0.0, 1.0));
        let mut colormap = Vec::with_capacity(COLORMAP_SIZE * 4);
        for i in 0..COLORMAP_SIZE {
            let x = i as f32 / (COLORMAP_SIZE - 1) as f32;
            let rgb = lookup.sample(x).truncate();
            colormap.extend_from_slice(&[
                to_byte(rgb.x),
                to_byte(rgb.y),
                to_byte(rgb.z),
                to_byte(self.opacity_at(x)),
            ]);
        }
        colormap
    }

    pub fn transfer_function(&self, range: ValueRange) -> TransferFunction {
        TransferFunction::from_rgba8(&self.colormap_rgba8(), range)
    }

    /// Draw the editor; returns true when this call edited the curve or preset
    pub fn draw(&mut self, ui: &mut Ui) -> bool {
        let before = self.changed;

        let mut preset = self.preset;
        ComboBox::from_label("Color map")
            .selected_text(preset.name())
            .show_ui(ui, |ui| {
                for option in ColorMap::ALL {
                    ui.selectable_value(&mut preset, option, option.name());
                }
            });
        self.set_preset(preset);

        let width = ui.available_width().max(64.0);
        let (response, painter) = ui.allocate_painter(egui::vec2(width, CANVAS_HEIGHT), Sense::click_and_drag());
        let rect = response.rect;

        let colors = TransferFunction::from_preset(self.preset, ValueRange::new(0.0, 1.0));
        let strip = rect.width() / GRADIENT_STRIPS as f32;
        for i in 0..GRADIENT_STRIPS {
            let x = (i as f32 + 0.5) / GRADIENT_STRIPS as f32;
            let strip_rect = Rect::from_min_size(
                Pos2::new(rect.left() + i as f32 * strip, rect.top()),
                egui::vec2(strip + 1.0, rect.height()),
            );
            painter.rect_filled(strip_rect, 0.0, to_color32(colors.sample(x).truncate(), 0.35));
        }

        let to_screen = |p: Vec2| Pos2::new(rect.left() + p.x * rect.width(), rect.bottom() - p.y * rect.height());
        let stroke = Stroke::new(2.0, Color32::WHITE);
        for pair in self.points.windows(2) {
            painter.line_segment([to_screen(pair[0]), to_screen(pair[1])], stroke);
        }
        for (i, p) in self.points.iter().enumerate() {
            let color = if Some(i) == self.selected { Color32::YELLOW } else { Color32::WHITE };
            painter.circle_filled(to_screen(*p), 4.0, color);
        }

        let to_curve = |pos: Pos2| {
            Vec2::new(
                (pos.x - rect.left()) / rect.width(),
                (rect.bottom() - pos.y) / rect.height(),
            )
        };
        if let Some(pos) = response.interact_pointer_pos() {
            if response.secondary_clicked() {
                self.remove_point_near(to_curve(pos));
            } else if response.drag_started_by(egui::PointerButton::Primary) || response.clicked() {
                self.begin_drag(to_curve(pos));
            } else if response.dragged_by(egui::PointerButton::Primary) {
                self.drag_to(to_curve(pos));
            }
        }
        if response.drag_stopped() || response.clicked() {
            self.end_drag();
        }

        ui.label("Left drag: add or move points. Right click: remove.");
        self.changed && !before
    }

    fn point_near(&self, pos: Vec2) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance(pos)))
            .filter(|(_, d)| *d <= PICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

impl Default for TransferFunctionWidget {
    fn default() -> Self {
        Self::new(ColorMap::default())
    }
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_color32(rgb: Vec3, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(to_byte(rgb.x), to_byte(rgb.y), to_byte(rgb.z), to_byte(alpha))
}
