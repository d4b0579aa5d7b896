//! Progress sequence combinators
//!
//! Every combinator maps the frame value and leaves `delta_time` alone, so
//! they compose in any order:
//!
//! ```rust
//! use std::time::Duration;
//! use ticktween_animation::{Animator, ProgressExt};
//! use ticktween_core::FrameTicker;
//!
//! let ticker = FrameTicker::new();
//! let animator = Animator::from_clock(ticker.clock());
//! let bouncing = animator
//!     .create_animation(Duration::from_secs(1))
//!     .go_backwards_when_finished()
//!     .with_ease_out_bounce()
//!     .repeat_forever();
//! # drop(bouncing);
//! ```

use crate::animate::{self, AnimateOptions};
use crate::easing::{self, Easing};
use crate::frame::{ProgressFrame, ProgressSequence};
use rxrust::prelude::*;
use std::error::Error as StdError;
use std::rc::Rc;
use ticktween_core::{ConcatOp, RepeatOp, StreamError};

/// Combinators on progress sequences
pub trait ProgressExt: Sized {
    /// Reshape every value with `f`
    fn transform<F>(self, f: F) -> ProgressSequence
    where
        F: Fn(f64) -> f64 + 'static;

    /// Apply an easing preset
    fn with_easing(self, easing: Easing) -> ProgressSequence {
        self.transform(move |t| easing.apply(t))
    }

    /// `t²`
    fn with_quadratic_easing(self) -> ProgressSequence {
        self.transform(easing::quadratic)
    }

    /// `t³`
    fn with_cubic_easing(self) -> ProgressSequence {
        self.transform(easing::cubic)
    }

    /// Bouncing deceleration
    fn with_ease_out_bounce(self) -> ProgressSequence {
        self.transform(easing::ease_out_bounce)
    }

    /// Mirror the values: `1 - t`
    fn backwards(self) -> ProgressSequence {
        self.transform(easing::backwards)
    }

    /// Run the sequence, then a fresh activation of it played backwards.
    ///
    /// The backward leg re-runs its own timing rather than replaying the
    /// forward leg's frames.
    fn go_backwards_when_finished(self) -> ProgressSequence;

    /// Restart the sequence every time it completes, until released
    fn repeat_forever(self) -> ProgressSequence;

    /// Run the sequence `count` times back to back
    fn repeat_times(self, count: usize) -> ProgressSequence;

    /// Drive `callback` with every frame, using the default options
    fn animate<F>(self, callback: F) -> ProgressSequence
    where
        F: Fn(ProgressFrame) + 'static,
    {
        self.animate_with(callback, AnimateOptions::default())
    }

    /// Drive `callback` with every frame, rescaled per `options`
    fn animate_with<F>(self, callback: F, options: AnimateOptions) -> ProgressSequence
    where
        F: Fn(ProgressFrame) + 'static,
    {
        self.try_animate(
            move |frame| {
                callback(frame);
                Ok::<(), std::convert::Infallible>(())
            },
            options,
        )
    }

    /// Like [`ProgressExt::animate_with`] with a fallible callback.
    ///
    /// An `Err` terminates the activation through its error channel.
    fn try_animate<F, E>(self, callback: F, options: AnimateOptions) -> ProgressSequence
    where
        F: Fn(ProgressFrame) -> Result<(), E> + 'static,
        E: StdError + Send + Sync + 'static;

    /// Subscribe for the side effects alone.
    ///
    /// Errors reaching the end of the pipeline are logged and dropped.
    fn activate(self) -> BoxSubscription<'static>;
}

impl ProgressExt for ProgressSequence {
    fn transform<F>(self, f: F) -> ProgressSequence
    where
        F: Fn(f64) -> f64 + 'static,
    {
        let f = Rc::new(f);
        self.map(move |frame: ProgressFrame| frame.map(|t| f(t)))
            .box_it()
    }

    fn go_backwards_when_finished(self) -> ProgressSequence {
        let backwards = self.clone().backwards();
        ConcatOp::new(self, backwards).box_it()
    }

    fn repeat_forever(self) -> ProgressSequence {
        RepeatOp::forever(self).box_it()
    }

    fn repeat_times(self, count: usize) -> ProgressSequence {
        RepeatOp::times(self, count).box_it()
    }

    fn try_animate<F, E>(self, callback: F, options: AnimateOptions) -> ProgressSequence
    where
        F: Fn(ProgressFrame) -> Result<(), E> + 'static,
        E: StdError + Send + Sync + 'static,
    {
        animate::animate(
            self,
            move |frame| callback(frame).map_err(StreamError::callback),
            options,
        )
    }

    fn activate(self) -> BoxSubscription<'static> {
        self.actual_subscribe(Activation)
    }
}

/// Observer that keeps an activation alive without consuming its frames
struct Activation;

impl Observer<ProgressFrame, StreamError> for Activation {
    fn next(&mut self, _: ProgressFrame) {}

    fn error(self, error: StreamError) {
        tracing::warn!(%error, "animation failed");
    }

    fn complete(self) {
        tracing::trace!("animation finished");
    }

    fn is_finished(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::time::Duration;
    use ticktween_core::FrameTicker;

    /// Replays `values` on the ticker, one frame per tick, then completes.
    ///
    /// Activations share a cursor that wraps around, so a second activation
    /// starts over from the first value.
    fn frames(ticker: &FrameTicker, values: &[f64]) -> ProgressSequence {
        let frames: Rc<Vec<ProgressFrame>> = Rc::new(
            values
                .iter()
                .enumerate()
                .map(|(i, value)| ProgressFrame::new(*value, Duration::from_millis(i as u64 * 10)))
                .collect(),
        );
        let cursor = Rc::new(Cell::new(0usize));
        let count = frames.len();
        ticker
            .clock()
            .map(move |_: ()| {
                let index = cursor.get();
                cursor.set(index + 1);
                frames[index % frames.len()]
            })
            .take(count)
            .box_it()
    }

    fn collect(ticker: &FrameTicker, sequence: ProgressSequence, ticks: usize) -> Vec<ProgressFrame> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = sequence
            .animate(move |frame| sink.borrow_mut().push(frame))
            .activate();
        for _ in 0..ticks {
            ticker.tick();
        }
        let frames = seen.borrow().clone();
        frames
    }

    fn values(frames: &[ProgressFrame]) -> Vec<f64> {
        frames.iter().map(|frame| frame.value).collect()
    }

    #[test]
    fn test_transform_keeps_delta_time() {
        let ticker = FrameTicker::new();
        let source = frames(&ticker, &[0.0, 0.25, 0.5]);
        let doubled = collect(&ticker, source.transform(|t| t * 2.0), 3);

        assert_eq!(values(&doubled), vec![0.0, 0.5, 1.0]);
        assert_eq!(doubled[2].delta_time, Duration::from_millis(20));
    }

    #[test]
    fn test_backwards_mirrors_values() {
        let ticker = FrameTicker::new();
        let mirrored = collect(&ticker, frames(&ticker, &[0.25, 0.5, 1.0]).backwards(), 3);
        assert_eq!(values(&mirrored), vec![0.75, 0.5, 0.0]);
    }

    #[test]
    fn test_easing_presets() {
        let ticker = FrameTicker::new();
        let source = frames(&ticker, &[0.5]);
        let quadratic = collect(&ticker, source.clone().with_quadratic_easing(), 1);
        let cubic = collect(&ticker, source.clone().with_cubic_easing(), 1);
        assert_eq!(quadratic[0].value, 0.25);
        assert_eq!(cubic[0].value, 0.125);
        assert_eq!(
            collect(&ticker, source.clone().with_easing(Easing::EaseOutBounce), 1)[0].value,
            collect(&ticker, source.with_ease_out_bounce(), 1)[0].value
        );
    }

    #[test]
    fn test_go_backwards_when_finished_appends_reversed_run() {
        let ticker = FrameTicker::new();
        let source = frames(&ticker, &[0.5, 1.0]);
        let round_trip = collect(&ticker, source.go_backwards_when_finished(), 4);
        assert_eq!(values(&round_trip), vec![0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_repeat_times_replays_rounds() {
        let ticker = FrameTicker::new();
        let rounds = collect(&ticker, frames(&ticker, &[0.5, 1.0]).repeat_times(2), 6);
        assert_eq!(values(&rounds), vec![0.5, 1.0, 0.5, 1.0]);
    }
}
