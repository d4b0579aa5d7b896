//! Time sources and stopwatches
//!
//! Elapsed time is always read through a [`TimeSource`], so code measuring
//! wall-clock time can be driven deterministically by a [`ManualTime`].

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic clock reading time since an arbitrary origin
pub trait TimeSource: Send + Sync + fmt::Debug {
    fn now(&self) -> Duration;
}

/// Real monotonic time, measured from the moment the clock was created
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Time that only moves when told to.
///
/// Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualTime {
    now: Arc<Mutex<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta`
    pub fn advance(&self, delta: Duration) {
        *self.now.lock() += delta;
    }

    /// Jump to an absolute reading; readings never go backwards
    pub fn set(&self, now: Duration) {
        let mut current = self.now.lock();
        *current = (*current).max(now);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

/// Measures elapsed time against a [`TimeSource`]
#[derive(Clone, Debug)]
pub struct Stopwatch {
    time: Arc<dyn TimeSource>,
    started_at: Option<Duration>,
    accumulated: Duration,
}

impl Stopwatch {
    /// Create a running stopwatch
    pub fn start_new(time: Arc<dyn TimeSource>) -> Self {
        let started_at = Some(time.now());
        Self {
            time,
            started_at,
            accumulated: Duration::ZERO,
        }
    }

    /// Total running time
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + self.time.now().saturating_sub(started_at),
            None => self.accumulated,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Zero the elapsed time and keep (or start) running
    pub fn restart(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(self.time.now());
    }

    /// Freeze the elapsed time
    pub fn stop(&mut self) {
        self.accumulated = self.elapsed();
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_follows_manual_time() {
        let time = ManualTime::new();
        let mut stopwatch = Stopwatch::start_new(Arc::new(time.clone()));

        time.advance(Duration::from_millis(40));
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(40));

        stopwatch.stop();
        time.advance(Duration::from_millis(10));
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(40));
        assert!(!stopwatch.is_running());

        stopwatch.restart();
        time.advance(Duration::from_millis(5));
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(5));
        assert!(stopwatch.is_running());
    }

    #[test]
    fn test_manual_time_never_goes_backwards() {
        let time = ManualTime::new();
        time.set(Duration::from_millis(100));
        time.set(Duration::from_millis(50));
        assert_eq!(time.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_manual_time_usable_after_holder_panicked() {
        let time = ManualTime::new();
        let shared = time.clone();

        let panicked = std::thread::spawn(move || {
            let _guard = shared.now.lock();
            panic!("panicked while holding the reading");
        })
        .join();
        assert!(panicked.is_err());

        time.advance(Duration::from_millis(16));
        assert_eq!(time.now(), Duration::from_millis(16));
    }

    #[test]
    fn test_wall_clock_is_monotonic() {
        let clock = WallClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
