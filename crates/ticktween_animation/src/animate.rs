//! The animate sink
//!
//! Terminal stage of an animation pipeline: rescales progress into an
//! application range, hands every frame to a callback, and decides what the
//! callback sees last when the activation is torn down early.
//!
//! Each activation moves through `Running -> {Completed, Failed, Cancelled}`.
//! Only `Cancelled` (released by the consumer before the source finished)
//! applies the [`AnimationCancellationOptions`] snap.

use crate::frame::{ProgressFrame, ProgressSequence};
use rxrust::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use ticktween_core::{SingleAssignmentSubscription, Stopwatch, StreamError, TimeSource, WallClock};

/// What the callback sees when an animation is cancelled before reaching its end
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationCancellationOptions {
    /// Leave the last delivered value in place
    #[default]
    KeepLastValue,
    /// Deliver one final frame at the start of the range
    SnapToStart,
    /// Deliver one final frame at the end of the range
    SnapToEnd,
}

/// Range and cancellation behaviour of an animate sink
#[derive(Clone, Debug)]
pub struct AnimateOptions {
    pub cancellation: AnimationCancellationOptions,
    pub from: f64,
    pub to: f64,
    time: Arc<dyn TimeSource>,
}

impl AnimateOptions {
    pub fn new() -> Self {
        Self {
            cancellation: AnimationCancellationOptions::KeepLastValue,
            from: 0.0,
            to: 1.0,
            time: Arc::new(WallClock::new()),
        }
    }

    /// Builder: set the cancellation behaviour
    pub fn cancellation(mut self, cancellation: AnimationCancellationOptions) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Builder: rescale progress 0..1 into `from..to`
    pub fn range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Builder: measure the time since the last frame with `time`
    pub fn time_source<S: TimeSource + 'static>(mut self, time: S) -> Self {
        self.time = Arc::new(time);
        self
    }

    /// Map a progress value into the range, clamped to its bounds
    pub fn rescale(&self, progress: f64) -> f64 {
        let value = self.from + progress * (self.to - self.from);
        value.clamp(self.from.min(self.to), self.from.max(self.to))
    }
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self::new()
    }
}

type Callback = Rc<dyn Fn(ProgressFrame) -> Result<(), StreamError>>;

/// Drive `callback` from `source`.
///
/// The returned sequence forwards the source's frames unchanged once the
/// callback has seen them. Releasing an activation before the source
/// completes applies `options.cancellation`.
pub fn animate<F>(source: ProgressSequence, callback: F, options: AnimateOptions) -> ProgressSequence
where
    F: Fn(ProgressFrame) -> Result<(), StreamError> + 'static,
{
    AnimateOp {
        source,
        callback: Rc::new(callback),
        options,
    }
    .box_it()
}

#[derive(Clone)]
struct AnimateOp {
    source: ProgressSequence,
    callback: Callback,
    options: AnimateOptions,
}

impl<O> Observable<ProgressFrame, StreamError, O> for AnimateOp
where
    O: Observer<ProgressFrame, StreamError> + 'static,
{
    type Unsub = AnimateSubscription;

    fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let sink = Rc::new(Sink::new(self.callback, self.options));
        let upstream = SingleAssignmentSubscription::new();

        let subscription = self.source.actual_subscribe(SinkObserver {
            sink: sink.clone(),
            downstream: Some(observer),
        });
        if let Err(error) = upstream.set(subscription) {
            tracing::warn!(%error, "animate sink assigned twice");
        }

        AnimateSubscription { sink, upstream }
    }
}

impl ObservableExt<ProgressFrame, StreamError> for AnimateOp {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Completed,
    Failed,
    Cancelled,
}

struct SinkState {
    phase: Phase,
    last_value: f64,
    since_last_frame: Option<Stopwatch>,
    in_callback: bool,
    pending_snap: Option<ProgressFrame>,
}

/// State of one activation of an animate sink
struct Sink {
    callback: Callback,
    options: AnimateOptions,
    state: RefCell<SinkState>,
}

impl Sink {
    fn new(callback: Callback, options: AnimateOptions) -> Self {
        let since_last_frame = match options.cancellation {
            AnimationCancellationOptions::KeepLastValue => None,
            _ => Some(Stopwatch::start_new(options.time.clone())),
        };
        Self {
            callback,
            options,
            state: RefCell::new(SinkState {
                phase: Phase::Running,
                last_value: 0.0,
                since_last_frame,
                in_callback: false,
                pending_snap: None,
            }),
        }
    }

    fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// Record a frame about to be delivered; false once the activation ended
    fn begin_frame(&self, value: f64) -> bool {
        let mut state = self.state.borrow_mut();
        if state.phase != Phase::Running {
            return false;
        }
        state.last_value = value;
        if let Some(stopwatch) = state.since_last_frame.as_mut() {
            stopwatch.restart();
        }
        state.in_callback = true;
        true
    }

    /// Leave the callback, collecting a snap requested while it ran
    fn end_frame(&self) -> Option<ProgressFrame> {
        let mut state = self.state.borrow_mut();
        state.in_callback = false;
        state.pending_snap.take()
    }

    fn finish(&self, phase: Phase) {
        let mut state = self.state.borrow_mut();
        if state.phase == Phase::Running {
            state.phase = phase;
        }
    }

    /// Release the activation.
    ///
    /// Only the first release of a running activation snaps. The upstream
    /// subscription is released even if the snap callback panics.
    fn teardown(&self, upstream: SingleAssignmentSubscription) {
        let _release = ReleaseOnDrop(Some(upstream));

        let snap = {
            let mut state = self.state.borrow_mut();
            if state.phase != Phase::Running {
                return;
            }
            state.phase = Phase::Cancelled;

            let snap = self.snap_frame(&mut state);
            match snap {
                // The in-flight frame delivers the snap once its callback returns.
                Some(frame) if state.in_callback => {
                    state.pending_snap = Some(frame);
                    None
                }
                snap => snap,
            }
        };

        if let Some(frame) = snap {
            self.deliver_snap(frame);
        }
    }

    fn snap_frame(&self, state: &mut SinkState) -> Option<ProgressFrame> {
        let options = &self.options;
        let value = match options.cancellation {
            AnimationCancellationOptions::KeepLastValue => return None,
            AnimationCancellationOptions::SnapToStart => options.from,
            AnimationCancellationOptions::SnapToEnd => options.to,
        };
        if state.last_value == options.to {
            tracing::debug!("animation cancelled at its end value, no snap");
            return None;
        }

        let delta_time = match state.since_last_frame.as_mut() {
            Some(stopwatch) => {
                let elapsed = stopwatch.elapsed();
                stopwatch.stop();
                elapsed
            }
            None => Duration::ZERO,
        };
        tracing::debug!(
            value,
            cancellation = ?options.cancellation,
            "animation cancelled, snapping"
        );
        Some(ProgressFrame::new(value, delta_time))
    }

    fn deliver_snap(&self, frame: ProgressFrame) {
        if let Err(error) = (self.callback)(frame) {
            tracing::warn!(%error, "animation callback failed while snapping");
        }
    }
}

struct ReleaseOnDrop(Option<SingleAssignmentSubscription>);

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        if let Some(upstream) = self.0.take() {
            upstream.unsubscribe();
        }
    }
}

struct SinkObserver<O> {
    sink: Rc<Sink>,
    downstream: Option<O>,
}

impl<O> Observer<ProgressFrame, StreamError> for SinkObserver<O>
where
    O: Observer<ProgressFrame, StreamError>,
{
    fn next(&mut self, frame: ProgressFrame) {
        let value = self.sink.options.rescale(frame.value);
        if !self.sink.begin_frame(value) {
            return;
        }

        let result = (self.sink.callback)(frame.with_value(value));
        let snap = self.sink.end_frame();

        match result {
            Ok(()) => match snap {
                Some(snap) => self.sink.deliver_snap(snap),
                None => {
                    if let Some(downstream) = self.downstream.as_mut() {
                        downstream.next(frame);
                    }
                }
            },
            Err(error) => {
                tracing::warn!(%error, "animation callback failed");
                self.sink.finish(Phase::Failed);
                if let Some(downstream) = self.downstream.take() {
                    downstream.error(error);
                }
            }
        }
    }

    fn error(self, err: StreamError) {
        self.sink.finish(Phase::Failed);
        if let Some(downstream) = self.downstream {
            downstream.error(err);
        }
    }

    fn complete(self) {
        self.sink.finish(Phase::Completed);
        if let Some(downstream) = self.downstream {
            downstream.complete();
        }
    }

    fn is_finished(&self) -> bool {
        self.sink.phase() != Phase::Running
            || self
                .downstream
                .as_ref()
                .map_or(true, |downstream| downstream.is_finished())
    }
}

/// Subscription of one animate sink activation.
///
/// Releasing it while the source is still running cancels the activation.
pub struct AnimateSubscription {
    sink: Rc<Sink>,
    upstream: SingleAssignmentSubscription,
}

impl Subscription for AnimateSubscription {
    fn unsubscribe(self) {
        self.sink.teardown(self.upstream);
    }

    fn is_closed(&self) -> bool {
        self.sink.phase() != Phase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_clamps_to_range() {
        let options = AnimateOptions::new().range(10.0, 20.0);
        assert_eq!(options.rescale(0.5), 15.0);
        assert_eq!(options.rescale(1.5), 20.0);
        assert_eq!(options.rescale(-0.5), 10.0);
    }

    #[test]
    fn test_rescale_reversed_range() {
        let options = AnimateOptions::new().range(1.0, 0.0);
        assert_eq!(options.rescale(0.25), 0.75);
        assert_eq!(options.rescale(2.0), 0.0);
    }

    #[test]
    fn test_fresh_sink_counts_as_starting_from_zero() {
        let callback: Callback = Rc::new(|_: ProgressFrame| Ok::<(), StreamError>(()));
        let sink = Sink::new(
            callback,
            AnimateOptions::new()
                .range(1.0, 0.0)
                .cancellation(AnimationCancellationOptions::SnapToEnd),
        );

        let mut state = sink.state.borrow_mut();
        assert_eq!(state.last_value, 0.0);
        assert!(sink.snap_frame(&mut state).is_none());
    }
}
