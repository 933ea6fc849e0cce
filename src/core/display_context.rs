use glam::Vec2;

/// Display context - viewport dimensions and pixel normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context; zero sizes are raised to one pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Render-target size for a window scaled by `scale`
    pub fn scaled(&self, scale: f32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self::new(
            (self.width as f32 * scale).round() as u32,
            (self.height as f32 * scale).round() as u32,
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Map a pixel position to [-1, 1] with +y up
    pub fn pixel_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            2.0 * x / self.width as f32 - 1.0,
            1.0 - 2.0 * y / self.height as f32,
        )
    }
}
