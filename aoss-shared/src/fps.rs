use std::time::Instant;

/// Frame rate meter that refreshes its reading every `step` frames
#[derive(Debug, Clone)]
pub struct FpsMeter {
    step: u32,
    frames: u64,
    window_start: Instant,
    fps: Option<f64>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::with_step(20)
    }

    pub fn with_step(step: u32) -> Self {
        Self {
            step: step.max(1),
            frames: 0,
            window_start: Instant::now(),
            fps: None,
        }
    }

    /// Count one frame. Returns the new reading when a window closes.
    pub fn measure(&mut self) -> Option<f64> {
        self.measure_at(Instant::now())
    }

    pub fn measure_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        if self.frames % self.step as u64 != 0 {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
        self.window_start = now;
        if elapsed <= 0.0 {
            return None;
        }

        let fps = self.step as f64 / elapsed;
        self.fps = Some(fps);
        Some(fps)
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current reading as display text, empty until the first window closes
    pub fn label(&self) -> String {
        self.fps
            .map(|fps| format!("{:.2} FPS", fps))
            .unwrap_or_default()
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_reading_only_every_step_frames() {
        let start = Instant::now();
        let mut meter = FpsMeter::with_step(4);
        meter.window_start = start;

        for i in 1..4 {
            assert_eq!(meter.measure_at(start + Duration::from_millis(i * 10)), None);
        }
        let fps = meter.measure_at(start + Duration::from_millis(200)).unwrap();
        assert!((fps - 20.0).abs() < 1e-9);
        assert_eq!(meter.label(), "20.00 FPS");
        assert_eq!(meter.frames(), 4);
    }

    #[test]
    fn test_label_empty_before_first_window() {
        let meter = FpsMeter::new();
        assert_eq!(meter.label(), "");
        assert_eq!(meter.fps(), None);
    }
}
