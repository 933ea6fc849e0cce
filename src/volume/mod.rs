// volume - Scalar field storage, sampling and raw file loading
mod loader;
mod value_range;

use glam::{UVec3, Vec3};

pub use loader::{dims_from_file_name, load_raw, resolve_dims, DataType};
pub use value_range::ValueRange;

use crate::math::AABB;

/// Regular grid of scalar samples stored x-fastest.
#[derive(Debug, Clone)]
pub struct Volume {
    voxels: Vec<f32>,
    dims: UVec3,
    spacing: Vec3,
    range: ValueRange,
}

impl Volume {
    /// Wrap `voxels`, which must hold exactly `dims.x * dims.y * dims.z` values.
    pub fn new(voxels: Vec<f32>, dims: UVec3) -> crate::error::Result<Self> {
        if dims.min_element() == 0 {
            return Err(crate::error::VolumeError::ZeroDimension(dims.to_array()));
        }
        let expected = element_count(dims)?;
        if expected != voxels.len() {
            return Err(crate::error::VolumeError::DimensionMismatch {
                dims: dims.to_array(),
                expected,
                actual: voxels.len(),
            });
        }
        let range = ValueRange::from_samples(voxels.iter().copied());
        Ok(Self {
            voxels,
            dims,
            spacing: Vec3::ONE,
            range,
        })
    }

    /// Build a volume by evaluating `f` at every voxel index
    pub fn from_fn(dims: UVec3, f: impl Fn(UVec3) -> f32) -> crate::error::Result<Self> {
        let mut voxels = Vec::with_capacity(element_count(dims)?);
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    voxels.push(f(UVec3::new(x, y, z)));
                }
            }
        }
        Self::new(voxels, dims)
    }

    pub fn with_spacing(mut self, spacing: Vec3) -> Self {
        if spacing.cmpgt(Vec3::ZERO).all() && spacing.is_finite() {
            self.spacing = spacing;
        }
        self
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    pub fn range(&self) -> ValueRange {
        self.range
    }

    pub fn voxels(&self) -> &[f32] {
        &self.voxels
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// World-space extent; voxel `i` covers `[i, i + 1] * spacing`
    pub fn bounds(&self) -> AABB {
        AABB::new(Vec3::ZERO, self.dims.as_vec3() * self.spacing)
    }

    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        x as usize + y as usize * self.dims.x as usize + z as usize * (self.dims.x as usize * self.dims.y as usize)
    }

    pub fn get(&self, x: u32, y: u32, z: u32) -> Option<f32> {
        if x >= self.dims.x || y >= self.dims.y || z >= self.dims.z {
            return None;
        }
        self.voxels.get(self.index(x, y, z)).copied()
    }

    /// Trilinear sample at a world-space position, clamped to the grid
    pub fn sample(&self, pos: Vec3) -> f32 {
        let max = (self.dims - UVec3::ONE).as_vec3();
        let grid = (pos / self.spacing - Vec3::splat(0.5)).clamp(Vec3::ZERO, max);

        let base = grid.floor();
        let t = grid - base;
        let lo = base.as_uvec3();
        let hi = (lo + UVec3::ONE).min(self.dims - UVec3::ONE);

        let at = |x: u32, y: u32, z: u32| self.voxels[self.index(x, y, z)];

        let c00 = lerp(at(lo.x, lo.y, lo.z), at(hi.x, lo.y, lo.z), t.x);
        let c10 = lerp(at(lo.x, hi.y, lo.z), at(hi.x, hi.y, lo.z), t.x);
        let c01 = lerp(at(lo.x, lo.y, hi.z), at(hi.x, lo.y, hi.z), t.x);
        let c11 = lerp(at(lo.x, hi.y, hi.z), at(hi.x, hi.y, hi.z), t.x);

        let c0 = lerp(c00, c10, t.y);
        let c1 = lerp(c01, c11, t.y);
        lerp(c0, c1, t.z)
    }

    /// Central-difference gradient in world units
    pub fn gradient(&self, pos: Vec3) -> Vec3 {
        let h = self.spacing;
        let dx = self.sample(pos + Vec3::new(h.x, 0.0, 0.0)) - self.sample(pos - Vec3::new(h.x, 0.0, 0.0));
        let dy = self.sample(pos + Vec3::new(0.0, h.y, 0.0)) - self.sample(pos - Vec3::new(0.0, h.y, 0.0));
        let dz = self.sample(pos + Vec3::new(0.0, 0.0, h.z)) - self.sample(pos - Vec3::new(0.0, 0.0, h.z));
        Vec3::new(dx, dy, dz) / (2.0 * h)
    }

    /// Every voxel value strictly below `iso`, in storage order
    pub fn values_below(&self, iso: f32) -> Vec<f32> {
        self.voxels.iter().copied().filter(|&v| v < iso).collect()
    }
}

fn element_count(dims: UVec3) -> crate::error::Result<usize> {
    (dims.x as usize)
        .checked_mul(dims.y as usize)
        .and_then(|n| n.checked_mul(dims.z as usize))
        .ok_or(crate::error::VolumeError::TooLarge(dims.to_array()))
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
