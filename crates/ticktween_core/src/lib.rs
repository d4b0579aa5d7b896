//! ticktween Core Runtime
//!
//! This crate provides the pieces the ticktween animation engine adds on top
//! of rxrust:
//!
//! - **Frame tickers**: hot tick sources pushed to by a render loop
//! - **Sequence operators**: `concat` and `repeat` over cold sequences
//! - **Subscriptions**: an assign-once handle that may be released before
//!   the upstream subscription exists
//! - **Time sources**: wall-clock and manually advanced stopwatches
//!
//! # Example
//!
//! ```rust
//! use rxrust::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use ticktween_core::{FrameTicker, RepeatOp, StreamError};
//!
//! #[derive(Clone, Default)]
//! struct Count(Rc<Cell<usize>>);
//!
//! impl Observer<(), StreamError> for Count {
//!     fn next(&mut self, _: ()) {
//!         self.0.set(self.0.get() + 1);
//!     }
//!     fn error(self, _: StreamError) {}
//!     fn complete(self) {}
//!     fn is_finished(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let ticker = FrameTicker::new();
//! let count = Count::default();
//! let round = ticker.clock().take(2).box_it();
//! let subscription = RepeatOp::times(round, 2).actual_subscribe(count.clone());
//!
//! for _ in 0..5 {
//!     ticker.tick();
//! }
//!
//! assert_eq!(count.0.get(), 4);
//! assert!(subscription.is_closed());
//! ```

pub mod error;
pub mod ops;
pub mod subscription;
pub mod ticker;
pub mod time;

pub use error::{Result, StreamError, SubscriptionError};
pub use ops::{ConcatOp, RepeatOp};
pub use subscription::SingleAssignmentSubscription;
pub use ticker::{FrameTicker, Sequence};
pub use time::{ManualTime, Stopwatch, TimeSource, WallClock};
