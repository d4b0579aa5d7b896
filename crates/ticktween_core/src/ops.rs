//! Sequencing operators
//!
//! rxrust interleaves sequences (`merge`) but has no operator that runs one
//! after another or restarts one when it completes. Both operators here
//! subscribe their sources lazily, so every round is a fresh, cold
//! subscription with its own state.

use crate::error::StreamError;
use crate::subscription::SingleAssignmentSubscription;
use crate::ticker::Sequence;
use rxrust::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Every item of `first`, then every item of a fresh subscription to
/// `second`.
///
/// `second` is not subscribed until `first` completes; an error in `first`
/// skips it.
pub struct ConcatOp<Item> {
    first: Sequence<Item>,
    second: Sequence<Item>,
}

impl<Item> ConcatOp<Item> {
    pub fn new(first: Sequence<Item>, second: Sequence<Item>) -> Self {
        Self { first, second }
    }
}

impl<Item: 'static> Clone for ConcatOp<Item> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
        }
    }
}

impl<Item, O> Observable<Item, StreamError, O> for ConcatOp<Item>
where
    Item: 'static,
    O: Observer<Item, StreamError> + 'static,
{
    type Unsub = ConcatSubscription;

    fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let second = SingleAssignmentSubscription::new();
        let first = self.first.actual_subscribe(ConcatObserver {
            observer,
            second: self.second,
            handle: second.clone(),
        });
        ConcatSubscription {
            first: BoxSubscription::new(first),
            second,
        }
    }
}

impl<Item> ObservableExt<Item, StreamError> for ConcatOp<Item> {}

struct ConcatObserver<O, Item> {
    observer: O,
    second: Sequence<Item>,
    handle: SingleAssignmentSubscription,
}

impl<O, Item> Observer<Item, StreamError> for ConcatObserver<O, Item>
where
    Item: 'static,
    O: Observer<Item, StreamError> + 'static,
{
    fn next(&mut self, value: Item) {
        self.observer.next(value);
    }

    fn error(self, err: StreamError) {
        self.handle.unsubscribe();
        self.observer.error(err);
    }

    fn complete(self) {
        if self.handle.is_released() {
            return;
        }
        let subscription = self.second.actual_subscribe(self.observer);
        if let Err(error) = self.handle.set(subscription) {
            tracing::warn!(%error, "concat subscribed its second sequence twice");
        }
    }

    fn is_finished(&self) -> bool {
        self.observer.is_finished()
    }
}

/// Subscription of a [`ConcatOp`]
pub struct ConcatSubscription {
    first: BoxSubscription<'static>,
    second: SingleAssignmentSubscription,
}

impl Subscription for ConcatSubscription {
    fn unsubscribe(self) {
        self.second.unsubscribe();
        self.first.unsubscribe();
    }

    fn is_closed(&self) -> bool {
        self.second.is_closed()
    }
}

/// Resubscribe to `source` every time it completes.
///
/// The next round is subscribed from inside the completion of the previous
/// one, so a round must not complete synchronously while being subscribed
/// or rounds nest on the stack. Tick-driven sequences never do.
pub struct RepeatOp<Item> {
    source: Sequence<Item>,
    count: Option<usize>,
}

impl<Item> RepeatOp<Item> {
    /// Repeat until unsubscribed
    pub fn forever(source: Sequence<Item>) -> Self {
        Self {
            source,
            count: None,
        }
    }

    /// Run `count` rounds back to back, then complete
    pub fn times(source: Sequence<Item>, count: usize) -> Self {
        Self {
            source,
            count: Some(count),
        }
    }
}

impl<Item: 'static> Clone for RepeatOp<Item> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            count: self.count,
        }
    }
}

impl<Item, O> Observable<Item, StreamError, O> for RepeatOp<Item>
where
    Item: 'static,
    O: Observer<Item, StreamError> + 'static,
{
    type Unsub = RepeatSubscription;

    fn actual_subscribe(self, observer: O) -> Self::Unsub {
        let rounds = Rounds::default();
        if self.count == Some(0) {
            rounds.close();
            observer.complete();
        } else {
            subscribe_round(self.source, observer, self.count, rounds.clone(), 0);
        }
        RepeatSubscription { rounds }
    }
}

impl<Item> ObservableExt<Item, StreamError> for RepeatOp<Item> {}

fn subscribe_round<Item, O>(
    source: Sequence<Item>,
    observer: O,
    remaining: Option<usize>,
    rounds: Rounds,
    round: usize,
) where
    Item: 'static,
    O: Observer<Item, StreamError> + 'static,
{
    tracing::trace!(round, "repeat round subscribed");
    let subscription = source.clone().actual_subscribe(RepeatObserver {
        observer,
        source,
        remaining,
        rounds: rounds.clone(),
        round,
    });
    rounds.install(round, BoxSubscription::new(subscription));
}

struct RepeatObserver<O, Item> {
    observer: O,
    source: Sequence<Item>,
    remaining: Option<usize>,
    rounds: Rounds,
    round: usize,
}

impl<O, Item> Observer<Item, StreamError> for RepeatObserver<O, Item>
where
    Item: 'static,
    O: Observer<Item, StreamError> + 'static,
{
    fn next(&mut self, value: Item) {
        self.observer.next(value);
    }

    fn error(self, err: StreamError) {
        self.rounds.close();
        self.observer.error(err);
    }

    fn complete(self) {
        let remaining = self.remaining.map(|count| count.saturating_sub(1));
        if remaining == Some(0) {
            self.rounds.close();
            self.observer.complete();
            return;
        }
        if self.rounds.is_closed() {
            return;
        }
        subscribe_round(
            self.source,
            self.observer,
            remaining,
            self.rounds,
            self.round + 1,
        );
    }

    fn is_finished(&self) -> bool {
        self.observer.is_finished()
    }
}

#[derive(Default)]
struct RoundsState {
    current: Option<BoxSubscription<'static>>,
    round: usize,
    closed: bool,
}

/// The live round of a repeat, shared between its observers and its
/// subscription
#[derive(Clone, Default)]
struct Rounds(Rc<RefCell<RoundsState>>);

impl Rounds {
    /// Keep the subscription of `round` unless a later round is already live.
    ///
    /// Finished rounds are dropped, not released: they released their
    /// sources when they completed.
    fn install(&self, round: usize, subscription: BoxSubscription<'static>) {
        let rejected = {
            let mut state = self.0.borrow_mut();
            if state.closed {
                Some(subscription)
            } else {
                if round >= state.round {
                    state.round = round;
                    state.current = Some(subscription);
                }
                None
            }
        };
        if let Some(subscription) = rejected {
            subscription.unsubscribe();
        }
    }

    fn close(&self) -> Option<BoxSubscription<'static>> {
        let mut state = self.0.borrow_mut();
        state.closed = true;
        state.current.take()
    }

    fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }
}

/// Subscription of a [`RepeatOp`]
pub struct RepeatSubscription {
    rounds: Rounds,
}

impl Subscription for RepeatSubscription {
    fn unsubscribe(self) {
        if let Some(current) = self.rounds.close() {
            current.unsubscribe();
        }
    }

    fn is_closed(&self) -> bool {
        self.rounds.is_closed()
    }
}
