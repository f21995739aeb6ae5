use ossim_core::timer::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Clock whose holds advance time instantly.
///
/// Clones share the same time, so a test can keep one handle while the
/// simulator owns another.
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now: Arc<Mutex<Duration>>,
    holds: Arc<Mutex<Vec<Duration>>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hold requested so far, in order.
    pub fn holds(&self) -> Vec<Duration> {
        self.holds.lock().unwrap().clone()
    }

    /// Sum of every hold requested so far.
    pub fn total_held(&self) -> Duration {
        self.holds().iter().sum()
    }
}

impl Clock for VirtualClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    fn hold(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
        self.holds.lock().unwrap().push(duration);
    }
}
