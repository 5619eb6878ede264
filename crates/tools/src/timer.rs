use std::time::Duration;

/// Rolling frame-time statistics.
///
/// Keeps the last `capacity` frame durations and counts frames that ran
/// past the budget.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
    budget: Duration,
    over_budget: u64,
    total_frames: u64,
}

impl FrameTimer {
    /// A 60 Hz budget.
    pub const DEFAULT_BUDGET: Duration = Duration::from_micros(16_667);

    pub fn new(capacity: usize) -> Self {
        Self::with_budget(capacity, Self::DEFAULT_BUDGET)
    }

    pub fn with_budget(capacity: usize, budget: Duration) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
            budget,
            over_budget: 0,
            total_frames: 0,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        let capacity = self.history.len();
        self.history[self.index] = dt;
        self.index = (self.index + 1) % capacity;
        if self.index == 0 {
            self.filled = true;
        }
        self.total_frames += 1;
        if dt > self.budget {
            self.over_budget += 1;
            tracing::trace!(?dt, budget = ?self.budget, "frame over budget");
        }
    }

    fn window(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames per second implied by the rolling average, or 0 with no data.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// Frames currently in the rolling window.
    pub fn count(&self) -> usize {
        if self.filled {
            self.history.len()
        } else {
            self.index
        }
    }

    /// Frames recorded since creation.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames since creation that exceeded the budget.
    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }
}
