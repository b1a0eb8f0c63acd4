use std::time::{Duration, Instant};

/// Wall clock of the frame loop: time since start and time between frames.
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last_frame: now }
    }

    /// Returns `(delta since the previous tick, elapsed since start)`.
    pub fn tick(&mut self) -> (Duration, Duration) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        (delta, now - self.start)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
