//! ticktween Animation System
//!
//! Clock-driven tweening built on rxrust sequences.
//!
//! # Features
//!
//! - **Animator**: turns any tick source into progress frames in `[0, 1]`,
//!   advancing by real elapsed time rather than tick count
//! - **Combinators**: easing curves, reversal and ping-pong, composable in any order
//! - **Animate sink**: rescales progress into an application range and
//!   snaps to a boundary when cancelled early
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use ticktween_animation::{Animator, ProgressExt};
//! use rxrust::prelude::*;
//! use ticktween_core::{FrameTicker, ManualTime};
//!
//! let ticker = FrameTicker::new();
//! let time = ManualTime::new();
//! let animator = Animator::with_time_source(ticker.clock(), time.clone());
//!
//! let subscription = animator
//!     .create_animation(Duration::from_secs(1))
//!     .with_quadratic_easing()
//!     .animate(|frame| println!("{:.2}", frame.value))
//!     .activate();
//!
//! for _ in 0..4 {
//!     time.advance(Duration::from_millis(250));
//!     ticker.tick();
//! }
//! assert!(subscription.is_closed());
//! ```

pub mod animate;
pub mod animator;
pub mod easing;
pub mod frame;
pub mod progress;

pub use animate::{AnimateOptions, AnimateSubscription, AnimationCancellationOptions};
pub use animator::{Animator, ProgressSubscription};
pub use easing::Easing;
pub use frame::{AnimationFrame, ProgressFrame, ProgressSequence};
pub use progress::ProgressExt;
