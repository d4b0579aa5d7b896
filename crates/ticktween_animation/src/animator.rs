//! Clock-to-progress conversion
//!
//! An [`Animator`] wraps a tick source. Each animation it creates is a cold
//! sequence: activating it starts a private stopwatch, and every upstream tick
//! advances progress by the wall-clock time elapsed since the previous tick.
//! The tick rate only affects how often progress is sampled, never how long
//! the animation takes.

use crate::frame::{AnimationFrame, ProgressFrame, ProgressSequence};
use rxrust::prelude::*;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use ticktween_core::{
    Sequence, SingleAssignmentSubscription, Stopwatch, StreamError, TimeSource, WallClock,
};

/// Creates progress sequences driven by a tick source
#[derive(Clone)]
pub struct Animator {
    clock: Sequence<()>,
    time: Arc<dyn TimeSource>,
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

impl Animator {
    /// Drive animations from `clock`, measuring real time
    pub fn from_clock<T: Clone + 'static>(clock: Sequence<T>) -> Self {
        Self::with_time_source(clock, WallClock::new())
    }

    /// Drive animations from `clock`, reading elapsed time from `time`
    pub fn with_time_source<T, S>(clock: Sequence<T>, time: S) -> Self
    where
        T: Clone + 'static,
        S: TimeSource + 'static,
    {
        Self {
            clock: clock.map(|_: T| ()).box_it(),
            time: Arc::new(time),
        }
    }

    /// A progress sequence running from 0 to 1 over `duration`.
    ///
    /// Every tick emits one frame. The sequence completes right after the
    /// first frame whose value is `<= 0` or `>= 1`; that frame is delivered.
    /// A zero duration completes on the first tick with value 1.
    pub fn create_animation(&self, duration: Duration) -> ProgressSequence {
        ProgressClock {
            clock: self.clock.clone(),
            time: self.time.clone(),
            duration,
        }
        .box_it()
    }
}

/// Cold progress sequence over a shared tick source
#[derive(Clone)]
struct ProgressClock {
    clock: Sequence<()>,
    time: Arc<dyn TimeSource>,
    duration: Duration,
}

impl<O> Observable<ProgressFrame, StreamError, O> for ProgressClock
where
    O: Observer<ProgressFrame, StreamError> + 'static,
{
    type Unsub = ProgressSubscription;

    fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let timing = Rc::new(RefCell::new(Timing::start(self.time, self.duration)));
        tracing::trace!(
            duration_ms = self.duration.as_secs_f64() * 1000.0,
            "animation activated"
        );

        let upstream = SingleAssignmentSubscription::new();
        let subscription = self.clock.actual_subscribe(ProgressObserver {
            observer: Some(observer),
            timing: timing.clone(),
        });
        if let Err(error) = upstream.set(subscription) {
            tracing::warn!(%error, "animation clock assigned twice");
        }

        ProgressSubscription { timing, upstream }
    }
}

impl ObservableExt<ProgressFrame, StreamError> for ProgressClock {}

/// Timing state owned by a single activation
struct Timing {
    stopwatch: Stopwatch,
    elapsed: Duration,
    value: f64,
    speed: f64,
    running: bool,
}

impl Timing {
    fn start(time: Arc<dyn TimeSource>, duration: Duration) -> Self {
        let speed = if duration.is_zero() {
            f64::INFINITY
        } else {
            1.0 / duration.as_secs_f64()
        };
        Self {
            stopwatch: Stopwatch::start_new(time),
            elapsed: Duration::ZERO,
            value: 0.0,
            speed,
            running: true,
        }
    }

    fn advance(&mut self) -> Option<ProgressFrame> {
        if !self.running {
            return None;
        }
        let now = self.stopwatch.elapsed();
        let delta_time = now.saturating_sub(self.elapsed);
        self.elapsed = now;

        self.value = if self.speed.is_infinite() {
            1.0
        } else {
            self.value + self.speed * delta_time.as_secs_f64()
        };
        Some(AnimationFrame::new(self.value, delta_time))
    }

    /// Stop the stopwatch; false if the activation had already stopped
    fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.stopwatch.stop();
        tracing::trace!(
            elapsed_ms = self.elapsed.as_secs_f64() * 1000.0,
            "animation stopped"
        );
        true
    }
}

struct ProgressObserver<O> {
    observer: Option<O>,
    timing: Rc<RefCell<Timing>>,
}

impl<O> Observer<(), StreamError> for ProgressObserver<O>
where
    O: Observer<ProgressFrame, StreamError>,
{
    fn next(&mut self, _: ()) {
        let Some(frame) = self.timing.borrow_mut().advance() else {
            return;
        };
        if let Some(observer) = self.observer.as_mut() {
            observer.next(frame);
        }

        // A release from inside `next` already stopped the activation.
        let reached_end = frame.value <= 0.0 || frame.value >= 1.0;
        if reached_end && self.timing.borrow_mut().stop() {
            if let Some(observer) = self.observer.take() {
                observer.complete();
            }
        }
    }

    fn error(self, err: StreamError) {
        self.timing.borrow_mut().stop();
        if let Some(observer) = self.observer {
            observer.error(err);
        }
    }

    fn complete(self) {
        self.timing.borrow_mut().stop();
        if let Some(observer) = self.observer {
            observer.complete();
        }
    }

    fn is_finished(&self) -> bool {
        !self.timing.borrow().running
            || self
                .observer
                .as_ref()
                .map_or(true, |observer| observer.is_finished())
    }
}

/// Subscription of one animation activation
pub struct ProgressSubscription {
    timing: Rc<RefCell<Timing>>,
    upstream: SingleAssignmentSubscription,
}

impl Subscription for ProgressSubscription {
    fn unsubscribe(self) {
        self.timing.borrow_mut().stop();
        self.upstream.unsubscribe();
    }

    fn is_closed(&self) -> bool {
        !self.timing.borrow().running
    }
}
