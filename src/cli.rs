// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;
use glam::UVec3;

use crate::config::ViewerConfig;
use crate::render::RenderMode;
use crate::transfer_function::ColorMap;
use crate::volume::DataType;

#[derive(Parser, Debug, Clone)]
#[command(name = "volume-viewer")]
#[command(about = "Interactive volume renderer with an arcball camera", long_about = None)]
pub struct Cli {
    /// Raw volume file of little-endian scalars
    #[arg(short, long)]
    pub file: PathBuf,

    /// Grid dimensions; read from a `WxHxD` file name suffix when omitted
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub dims: Option<Vec<u32>>,

    /// Element type of the raw file
    #[arg(long, value_enum, default_value_t = DataType::Float32)]
    pub dtype: DataType,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Samples accumulated per pixel
    #[arg(long)]
    pub spp: Option<u32>,

    /// Initial iso-value
    #[arg(long)]
    pub iso: Option<f32>,

    #[arg(long, value_enum)]
    pub mode: Option<RenderMode>,

    #[arg(long, value_enum)]
    pub colormap: Option<ColorMap>,
}

impl Cli {
    pub fn dims(&self) -> Option<UVec3> {
        match self.dims.as_deref() {
            Some([x, y, z]) => Some(UVec3::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Command-line values win over the config file
    pub fn apply_overrides(&self, config: &mut ViewerConfig) {
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if let Some(spp) = self.spp {
            config.render.samples_per_pixel = spp;
        }
        if let Some(iso) = self.iso {
            config.render.iso_value = Some(iso);
        }
        if let Some(mode) = self.mode {
            config.render.mode = mode;
        }
        if let Some(preset) = self.colormap {
            config.transfer_function.preset = preset;
        }
    }
}
