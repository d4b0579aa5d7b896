//! Animation frames

use std::time::Duration;
use ticktween_core::Sequence;

/// One step of an animation: a value and the wall-clock time since the
/// previous frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationFrame<T> {
    pub value: T,
    pub delta_time: Duration,
}

impl<T> AnimationFrame<T> {
    pub fn new(value: T, delta_time: Duration) -> Self {
        Self { value, delta_time }
    }

    /// Same timing, different value
    pub fn with_value<U>(self, value: U) -> AnimationFrame<U> {
        AnimationFrame {
            value,
            delta_time: self.delta_time,
        }
    }

    /// Transform the value, keeping the timing
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AnimationFrame<U> {
        AnimationFrame {
            value: f(self.value),
            delta_time: self.delta_time,
        }
    }
}

/// A frame whose value is fractional completion
pub type ProgressFrame = AnimationFrame<f64>;

/// A cold, cloneable sequence of progress frames
pub type ProgressSequence = Sequence<ProgressFrame>;
