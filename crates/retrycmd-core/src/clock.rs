//! Sleep capability used between retry attempts.
//!
//! The retry loop never calls `std::thread::sleep` directly; it goes through a
//! [`Sleeper`] so tests can substitute [`RecordingSleeper`] and run instantly.

use std::time::Duration;

pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

/// Blocks the calling thread for the requested delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Records requested delays without blocking.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    calls: Vec<Duration>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order.
    pub fn calls(&self) -> &[Duration] {
        &self.calls
    }

    pub fn total(&self) -> Duration {
        self.calls.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, delay: Duration) {
        self.calls.push(delay);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, delay: Duration) {
        (**self).sleep(delay);
    }
}
