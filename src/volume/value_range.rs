/// Closed range of scalar values.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ValueRange {
    pub low: f32,
    pub high: f32,
}

impl ValueRange {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Range with no elements; `extend` seeds it.
    pub fn empty() -> Self {
        Self {
            low: f32::NAN,
            high: f32::NAN,
        }
    }

    /// Smallest range holding every finite sample
    pub fn from_samples(samples: impl IntoIterator<Item = f32>) -> Self {
        let mut range = Self::empty();
        for value in samples {
            range.extend(value);
        }
        range
    }

    pub fn extend(&mut self, value: f32) {
        if !value.is_finite() {
            return;
        }
        if self.is_empty() {
            self.low = value;
            self.high = value;
            return;
        }
        self.low = self.low.min(value);
        self.high = self.high.max(value);
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_nan() || self.high.is_nan()
    }

    pub fn contains(&self, value: f32) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn width(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }

    pub fn midpoint(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            0.5 * (self.low + self.high)
        }
    }

    /// Map `value` into `[0, 1]`. A zero-width range maps everything to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let width = self.width();
        if width <= 0.0 || !width.is_finite() {
            return 0.0;
        }
        ((value - self.low) / width).clamp(0.0, 1.0)
    }

    pub fn lerp(&self, t: f32) -> f32 {
        self.low + (self.high - self.low) * t
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<std::ops::Range<f32>> for ValueRange {
    fn from(range: std::ops::Range<f32>) -> Self {
        Self::new(range.start, range.end)
    }
}
