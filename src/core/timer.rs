/// Self-contained timers - manage internal state from frame deltas
use std::time::Instant;

/// Fixed rate timer - fires at specific Hz
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    pub interval: f32,
    pub accumulator: f32,
}

impl FixedHz {
    /// Create timer that fires at given frequency
    pub fn new(hz: f32) -> Self {
        Self {
            interval: 1.0 / hz,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns true if should fire
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second estimate refreshed at a fixed rate
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    update: FixedHz,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(updates_per_second: f32) -> Self {
        Self {
            update: FixedHz::new(updates_per_second),
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Count one frame; returns the new estimate when it is refreshed
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.update.tick(delta) && self.elapsed > 0.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Wall-clock delta between successive frames
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Seconds since the previous call
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_hz_fires_at_rate() {
        let mut timer = FixedHz::new(60.0); // 60Hz = 0.0166s

        // Small delta - no fire
        assert!(!timer.tick(0.01));

        // Accumulate to threshold
        assert!(timer.tick(0.01)); // Total ~0.02s >= 0.0166s

        // Immediate next - no fire
        assert!(!timer.tick(0.001));
    }

    #[test]
    fn fps_counter_reports_once_per_interval() {
        let mut fps = FpsCounter::new(1.0);
        for _ in 0..7 {
            assert_eq!(fps.tick(0.125), None);
        }
        let estimate = fps.tick(0.125).unwrap();
        assert_eq!(estimate, 8.0);
        assert_eq!(fps.fps(), estimate);
    }

    #[test]
    fn fps_counter_starts_at_zero() {
        assert_eq!(FpsCounter::default().fps(), 0.0);
    }

    #[test]
    fn frame_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        assert!(clock.delta() >= 0.0);
    }
}
