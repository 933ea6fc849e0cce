use glam::Vec4;
use rayon::prelude::*;

use crate::math::to_srgba8;

/// Linear RGBA accumulation buffer. Row 0 is the top of the image.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    accum: Vec<Vec4>,
    frames: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            accum: vec![Vec4::ZERO; width as usize * height as usize],
            frames: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Number of frames accumulated since the last clear
    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    pub fn clear(&mut self) {
        self.accum.fill(Vec4::ZERO);
        self.frames = 0;
    }

    /// Resize and clear. Returns false when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    /// Add one sample per pixel, evaluated in parallel over rows
    pub fn accumulate<F>(&mut self, shade: F)
    where
        F: Fn(u32, u32) -> Vec4 + Sync,
    {
        let width = self.width as usize;
        self.accum
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel += shade(x as u32, y as u32);
                }
            });
        self.frames += 1;
    }

    /// Averaged color of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        if self.frames == 0 || x >= self.width || y >= self.height {
            return Vec4::ZERO;
        }
        self.accum[(y * self.width + x) as usize] / self.frames as f32
    }

    /// sRGB-encoded RGBA8 copy of the averaged image
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.accum.len() * 4];
        self.write_rgba8(&mut out);
        out
    }

    /// Encode into `out`, four bytes per pixel. Returns false, leaving `out`
    /// untouched, when its length does not match the image.
    fn write_rgba8(&self, out: &mut [u8]) -> bool {
        let Ok(texels) = bytemuck::try_cast_slice_mut::<u8, [u8; 4]>(out) else {
            return false;
        };
        if texels.len() != self.accum.len() {
            return false;
        }
        let scale = if self.frames == 0 { 0.0 } else { 1.0 / self.frames as f32 };
        texels
            .par_iter_mut()
            .zip(self.accum.par_iter())
            .for_each(|(dst, src)| *dst = to_srgba8(*src * scale));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.frame_count(), 0);
        assert_eq!(fb.pixel(0, 0), Vec4::ZERO);
        assert_eq!(fb.to_rgba8().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let fb = FrameBuffer::new(0, 0);
        assert_eq!((fb.width(), fb.height()), (1, 1));
    }

    #[test]
    fn test_accumulate_averages() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.accumulate(|_, _| Vec4::new(1.0, 0.0, 0.0, 1.0));
        fb.accumulate(|_, _| Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(fb.frame_count(), 2);
        assert_eq!(fb.pixel(1, 1), Vec4::new(0.5, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_accumulate_passes_coordinates() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.accumulate(|x, y| Vec4::new(x as f32, y as f32, 0.0, 0.0));
        assert_eq!(fb.pixel(2, 1), Vec4::new(2.0, 1.0, 0.0, 0.0));
        assert_eq!(fb.pixel(0, 1), Vec4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.accumulate(|_, _| Vec4::ONE);
        fb.clear();
        assert_eq!(fb.frame_count(), 0);
        assert!(!fb.resize(2, 2));
        assert!(fb.resize(8, 4));
        assert_eq!(fb.aspect(), 2.0);
    }

    #[test]
    fn test_to_rgba8_encodes_srgb() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.accumulate(|_, _| Vec4::new(1.0, 0.0, 0.5, 1.0));
        let bytes = fb.to_rgba8();
        assert_eq!(bytes[0], 255);
        assert_eq!(bytes[1], 0);
        // linear 0.5 is brighter than 128 once encoded
        assert!(bytes[2] > 180);
        assert_eq!(bytes[3], 255);
    }

    #[test]
    fn test_write_rgba8_rejects_wrong_length() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.accumulate(|_, _| Vec4::ONE);
        let mut short = [7u8; 4];
        assert!(!fb.write_rgba8(&mut short));
        assert_eq!(short, [7; 4]);
        let mut exact = [0u8; 8];
        assert!(fb.write_rgba8(&mut exact));
        assert_eq!(exact, [255; 8]);
    }
}
