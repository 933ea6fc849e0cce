// loader.rs - Headerless little-endian raw volume files
use std::path::Path;

use clap::ValueEnum;
use glam::UVec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::Volume;
use crate::error::{Result, VolumeError};

/// Element type of a raw file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[value(name = "uint8")]
    Uint8,
    #[value(name = "uint16")]
    Uint16,
    #[default]
    #[value(name = "float32")]
    Float32,
    #[value(name = "float64")]
    Float64,
}

impl DataType {
    pub fn size(self) -> usize {
        match self {
            DataType::Uint8 => 1,
            DataType::Uint16 => 2,
            DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }

    /// Decode little-endian bytes; `bytes.len()` must be a multiple of `size()`
    fn decode(self, bytes: &[u8]) -> Vec<f32> {
        match self {
            DataType::Uint8 => bytes.iter().map(|&b| b as f32).collect(),
            DataType::Uint16 => bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as f32)
                .collect(),
            DataType::Float32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            DataType::Float64 => bytes
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32)
                .collect(),
        }
    }
}

/// Read a raw volume.
///
/// The element count comes from the file size. Dimensions are taken from
/// `dims` when given, otherwise resolved by [`resolve_dims`].
pub fn load_raw(path: &Path, dtype: DataType, dims: Option<UVec3>) -> Result<Volume> {
    let bytes = std::fs::read(path).map_err(|source| VolumeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(VolumeError::Empty(path.to_path_buf()));
    }
    let element_size = dtype.size();
    if bytes.len() % element_size != 0 {
        return Err(VolumeError::TruncatedElement {
            size: bytes.len(),
            element_size,
        });
    }

    let count = bytes.len() / element_size;
    debug!("{}: {} bytes, {} {:?} samples", path.display(), bytes.len(), count, dtype);

    let dims = resolve_dims(path, count, dims)?;
    let volume = Volume::new(dtype.decode(&bytes), dims)?;

    let range = volume.range();
    info!(
        "Loaded {} dims=({}, {}, {}) range=({}, {})",
        path.display(),
        dims.x,
        dims.y,
        dims.z,
        range.low,
        range.high
    );
    Ok(volume)
}

/// Pick dimensions for `count` samples: explicit, then a `WxHxD` token in
/// the file name, then a perfect cube.
pub fn resolve_dims(path: &Path, count: usize, explicit: Option<UVec3>) -> Result<UVec3> {
    if let Some(dims) = explicit {
        return Ok(dims);
    }
    if let Some(dims) = dims_from_file_name(path) {
        debug!("Dimensions {:?} taken from file name", dims);
        return Ok(dims);
    }
    cube_root(count)
        .map(UVec3::splat)
        .ok_or(VolumeError::UnknownDimensions(count))
}

/// Find the last `WxHxD` token in the file stem, e.g. `skull_256x256x128.raw`
pub fn dims_from_file_name(path: &Path) -> Option<UVec3> {
    let stem = path.file_stem()?.to_str()?;
    stem.split(|c: char| c == '_' || c == '-' || c == '.')
        .rev()
        .find_map(parse_dims_token)
}

fn parse_dims_token(token: &str) -> Option<UVec3> {
    let mut parts = token.split(['x', 'X']);
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(UVec3::new(x, y, z))
}

fn cube_root(count: usize) -> Option<u32> {
    let guess = (count as f64).cbrt().round() as u64;
    (guess.saturating_sub(1)..=guess + 1)
        .find(|&n| n > 0 && n * n * n == count as u64)
        .and_then(|n| u32::try_from(n).ok())
}
