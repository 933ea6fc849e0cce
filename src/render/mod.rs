// render - Progressive CPU volume ray casting
mod framebuffer;
mod volume_renderer;

use clap::ValueEnum;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use framebuffer::FrameBuffer;
pub use volume_renderer::{halton, VolumeRenderer};

use crate::camera::CameraPose;
use crate::config::RenderConfig;
use crate::volume::ValueRange;

/// Produces frames from a camera snapshot
pub trait Renderer {
    /// Cast one jittered sample per pixel and add it to `framebuffer`
    fn render_frame(&mut self, pose: &CameraPose, framebuffer: &mut FrameBuffer);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Direct volume rendering through the transfer function
    #[default]
    Volume,
    /// Shaded surface at the iso-value
    Isosurface,
}

impl RenderMode {
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Volume => "Volume",
            RenderMode::Isosurface => "Isosurface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub mode: RenderMode,
    pub iso_value: f32,
    /// Distance between samples along a ray, in voxels
    pub step_size: f32,
    pub samples_per_pixel: u32,
    pub ambient_intensity: f32,
    pub specular: f32,
    /// Accumulated opacity at which a ray stops marching
    pub termination: f32,
    pub background: Vec3,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: RenderMode::Volume,
            iso_value: 0.1,
            step_size: 0.5,
            samples_per_pixel: 10,
            ambient_intensity: 0.3,
            specular: 0.2,
            termination: 0.99,
            background: Vec3::ZERO,
        }
    }
}

impl RenderSettings {
    /// Settings from configuration. A missing iso-value becomes the midpoint of `range`.
    pub fn from_config(config: &RenderConfig, range: ValueRange) -> Self {
        Self {
            mode: config.mode,
            iso_value: config.iso_value.unwrap_or_else(|| range.midpoint()),
            step_size: config.step_size.max(0.05),
            samples_per_pixel: config.samples_per_pixel.max(1),
            ambient_intensity: config.ambient_intensity.clamp(0.0, 1.0),
            specular: config.specular.max(0.0),
            ..Self::default()
        }
    }
}
