//! Tick sources
//!
//! Animations advance on ticks. The usual source is the application's own
//! render loop pushing one tick per drawn frame through a [`FrameTicker`]:
//!
//! ```rust
//! use ticktween_core::FrameTicker;
//!
//! let ticker = FrameTicker::new();
//! let clock = ticker.clock();
//! // ... build animations on `clock`, then once per rendered frame:
//! ticker.tick();
//! # drop(clock);
//! ```

use crate::error::StreamError;
use rxrust::ops::box_it::CloneableBoxOp;
use rxrust::prelude::*;

/// A cloneable, type-erased sequence failing with [`StreamError`]
pub type Sequence<Item> = CloneableBoxOp<'static, Item, StreamError>;

/// Multicast tick source pushed to by a render loop.
///
/// Clones share subscribers.
#[derive(Clone, Default)]
pub struct FrameTicker {
    subject: Subject<'static, (), StreamError>,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ticks pushed after each subscription
    pub fn clock(&self) -> Sequence<()> {
        self.subject.clone().box_it()
    }

    /// Deliver one tick to every subscriber
    pub fn tick(&self) {
        self.subject.clone().next(());
    }

    /// Fail every subscriber
    pub fn fail(&self, error: StreamError) {
        tracing::debug!(%error, "frame ticker failed");
        self.subject.clone().error(error);
    }

    /// Complete every subscriber
    pub fn stop(&self) {
        self.subject.clone().complete();
    }
}
