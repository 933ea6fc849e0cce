// transfer_function.rs - Piecewise-linear value to RGBA mapping
use clap::ValueEnum;
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::volume::ValueRange;

/// Opacities below this are treated as fully transparent
pub const OPACITY_CUTOFF: f32 = 0.1;

/// Built-in color maps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    #[default]
    Jet,
    Rgb,
    Grayscale,
}

impl ColorMap {
    pub const ALL: [ColorMap; 3] = [ColorMap::Jet, ColorMap::Rgb, ColorMap::Grayscale];

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Jet => "jet",
            ColorMap::Rgb => "rgb",
            ColorMap::Grayscale => "grayscale",
        }
    }

    pub fn colors(self) -> Vec<Vec3> {
        match self {
            ColorMap::Jet => vec![
                Vec3::new(0.0, 0.0, 0.562493),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(0.500008, 1.0, 0.500008),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.500008, 0.0, 0.0),
            ],
            ColorMap::Rgb => vec![Vec3::Z, Vec3::Y, Vec3::X],
            ColorMap::Grayscale => vec![Vec3::ZERO, Vec3::ONE],
        }
    }
}

/// Colors and opacities, each spread uniformly over `range`.
///
/// The two lists are interpolated independently and may differ in length.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    colors: Vec<Vec3>,
    opacities: Vec<f32>,
    range: ValueRange,
}

impl TransferFunction {
    pub fn new(colors: Vec<Vec3>, opacities: Vec<f32>, range: ValueRange) -> Self {
        let colors = if colors.is_empty() { vec![Vec3::ONE] } else { colors };
        let opacities = if opacities.is_empty() { vec![0.0] } else { opacities };
        Self {
            colors,
            opacities,
            range,
        }
    }

    /// Unpack an RGBA8 colormap, four bytes per entry.
    /// Alphas under [`OPACITY_CUTOFF`] become zero. A trailing partial entry is ignored.
    pub fn from_rgba8(colormap: &[u8], range: ValueRange) -> Self {
        let mut colors = Vec::with_capacity(colormap.len() / 4);
        let mut opacities = Vec::with_capacity(colormap.len() / 4);
        for entry in colormap.chunks_exact(4) {
            colors.push(Vec3::new(entry[0] as f32, entry[1] as f32, entry[2] as f32) / 255.0);
            let alpha = entry[3] as f32 / 255.0;
            opacities.push(if alpha < OPACITY_CUTOFF { 0.0 } else { alpha });
        }
        Self::new(colors, opacities, range)
    }

    /// Preset colors with a linear opacity ramp from 0 to 1
    pub fn from_preset(preset: ColorMap, range: ValueRange) -> Self {
        Self::new(preset.colors(), vec![0.0, 1.0], range)
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn set_range(&mut self, range: ValueRange) {
        self.range = range;
    }

    /// RGB in `xyz`, opacity in `w`
    pub fn sample(&self, value: f32) -> Vec4 {
        let t = self.range.normalize(value);
        let color = interpolate(&self.colors, t, |a, b, f| a.lerp(b, f));
        let opacity = interpolate(&self.opacities, t, |a, b, f| a + (b - a) * f);
        color.extend(opacity)
    }

    /// Pre-sampled table of `len` entries, used for fast lookups while ray marching
    pub fn bake(&self, len: usize) -> Vec<Vec4> {
        let len = len.max(2);
        (0..len)
            .map(|i| self.sample(self.range.lerp(i as f32 / (len - 1) as f32)))
            .collect()
    }
}

fn interpolate<T: Copy>(values: &[T], t: f32, mix: impl Fn(T, T, f32) -> T) -> T {
    if values.len() == 1 {
        return values[0];
    }
    let scaled = t.clamp(0.0, 1.0) * (values.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(values.len() - 2);
    mix(values[i], values[i + 1], scaled - i as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_cutoff() {
        let colormap = [255, 0, 0, 20, 0, 255, 0, 26, 0, 0, 255, 255];
        let tf = TransferFunction::from_rgba8(&colormap, ValueRange::new(0.0, 1.0));
        assert_eq!(tf.colors().len(), 3);
        // 20 / 255 is under the cutoff, 26 / 255 is not
        assert_eq!(tf.opacities()[0], 0.0);
        assert!((tf.opacities()[1] - 26.0 / 255.0).abs() < 1e-6);
        assert_eq!(tf.opacities()[2], 1.0);
    }

    #[test]
    fn test_from_rgba8_ignores_partial_entry() {
        let tf = TransferFunction::from_rgba8(&[1, 2, 3, 255, 9, 9], ValueRange::new(0.0, 1.0));
        assert_eq!(tf.colors().len(), 1);
    }

    #[test]
    fn test_empty_colormap_is_transparent() {
        let tf = TransferFunction::from_rgba8(&[], ValueRange::new(0.0, 1.0));
        assert_eq!(tf.sample(0.5).w, 0.0);
    }

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        let tf = TransferFunction::from_preset(ColorMap::Grayscale, ValueRange::new(10.0, 20.0));
        assert_eq!(tf.sample(10.0), Vec4::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(tf.sample(20.0), Vec4::ONE);
        let mid = tf.sample(15.0);
        assert!((mid - Vec4::splat(0.5)).length() < 1e-6);
        // clamped outside the range
        assert_eq!(tf.sample(-100.0), tf.sample(10.0));
        assert_eq!(tf.sample(100.0), tf.sample(20.0));
    }

    #[test]
    fn test_colors_and_opacities_interpolate_separately() {
        let tf = TransferFunction::from_preset(ColorMap::Rgb, ValueRange::new(0.0, 1.0));
        let s = tf.sample(0.5);
        assert!((s.truncate() - Vec3::Y).length() < 1e-6);
        assert!((s.w - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bake_matches_sample() {
        let tf = TransferFunction::from_preset(ColorMap::Jet, ValueRange::new(-1.0, 1.0));
        let table = tf.bake(5);
        assert_eq!(table.len(), 5);
        assert_eq!(table[0], tf.sample(-1.0));
        assert_eq!(table[4], tf.sample(1.0));
        assert_eq!(table[2], tf.sample(0.0));
    }
}
