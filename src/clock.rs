//! Frame clock: turns raw `performance.now()` stamps into clamped deltas.

#[derive(Clone, Debug)]
pub struct FrameClock {
    previous_ms: f64,
    max_delta_ms: f64,
}

impl FrameClock {
    pub fn new(now_ms: f64, max_delta_ms: f64) -> Self {
        Self { previous_ms: now_ms, max_delta_ms }
    }

    /// Elapsed time since the previous tick, clamped to `[0, max_delta_ms]`.
    /// A clock that goes backwards yields 0; a long stall (hidden tab) yields
    /// the maximum.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let delta = (now_ms - self.previous_ms).clamp(0.0, self.max_delta_ms);
        self.previous_ms = now_ms;
        delta
    }

    pub fn previous_ms(&self) -> f64 {
        self.previous_ms
    }
}
