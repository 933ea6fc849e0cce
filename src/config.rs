// config.rs - Viewer configuration loaded from JSON
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::RenderMode;
use crate::transfer_function::ColorMap;

/// Top-level configuration. Every section and field is optional in the
/// JSON file and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub transfer_function: TransferFunctionConfig,
}

impl ViewerConfig {
    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Volume Viewer".to_string(),
            width: 1024,
            height: 512,
        }
    }
}

/// Arcball tuning values. These are empirical, not derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial eye distance as a multiple of the bounding box diagonal
    pub distance_factor: f32,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Multiplier on the distance-scaled pan motion
    pub pan_speed: f32,
    /// Fraction of the diagonal travelled per unit of zoom
    pub zoom_speed: f32,
    /// Closest approach to the target as a fraction of the diagonal
    pub min_distance_fraction: f32,
    /// Farthest zoom-out as a multiple of the diagonal
    pub max_distance_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_factor: 1.5,
            fov_y_degrees: 60.0,
            pan_speed: 1.0,
            zoom_speed: 0.05,
            min_distance_fraction: 0.01,
            max_distance_factor: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Render resolution relative to the window size
    pub render_scale: f32,
    /// Number of jittered frames accumulated before rendering pauses
    pub samples_per_pixel: u32,
    /// Ray-marching step in voxels
    pub step_size: f32,
    pub ambient_intensity: f32,
    /// Specular coefficient for isosurface shading
    pub specular: f32,
    /// Initial iso-value; the middle of the value range when absent
    pub iso_value: Option<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Volume,
            render_scale: 0.5,
            samples_per_pixel: 10,
            step_size: 0.5,
            ambient_intensity: 0.3,
            specular: 0.2,
            iso_value: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferFunctionConfig {
    pub preset: ColorMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = ViewerConfig::from_json(r#"{ "camera": { "distance_factor": 2.0 } }"#).unwrap();
        assert_eq!(config.camera.distance_factor, 2.0);
        assert_eq!(config.camera.fov_y_degrees, 60.0);
        assert_eq!(config.window.width, 1024);
    }

    #[test]
    fn test_render_mode_and_preset_parse() {
        let config = ViewerConfig::from_json(
            r#"{ "render": { "mode": "isosurface", "iso_value": 0.25 },
                 "transfer_function": { "preset": "grayscale" } }"#,
        )
        .unwrap();
        assert_eq!(config.render.mode, RenderMode::Isosurface);
        assert_eq!(config.render.iso_value, Some(0.25));
        assert_eq!(config.transfer_function.preset, ColorMap::Grayscale);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(ViewerConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = ViewerConfig::load(Path::new("/nonexistent/viewer.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/viewer.json"));
    }
}
