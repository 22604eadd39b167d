//! Tick-driven delayed checks.
//!
//! A `Scheduler` holds payloads that become due after a delay measured in game
//! time (the clamped frame deltas), so retries advance with the same clock as
//! everything else and stop when the loop stops. Pending entries are dropped
//! wholesale on reset.

#[derive(Debug)]
struct Scheduled<T> {
    remaining_ms: f64,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: f64, payload: T) {
        self.tasks.push(Scheduled { remaining_ms: delay_ms.max(0.0), payload });
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advances every pending task and returns the payloads that came due, in
    /// the order they were scheduled.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            self.tasks[i].remaining_ms -= delta_ms;
            if self.tasks[i].remaining_ms <= 0.0 {
                due.push(self.tasks.remove(i).payload);
            } else {
                i += 1;
            }
        }
        due
    }
}
