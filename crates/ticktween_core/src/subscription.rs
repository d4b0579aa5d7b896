//! Subscription handles the animation pipeline needs beyond rxrust's own
//!
//! rxrust subscriptions are consumed by `unsubscribe`, and an upstream
//! subscription only exists once `actual_subscribe` returns. A source that
//! terminates synchronously, or a consumer that cancels from inside a
//! callback, can therefore ask for a release before there is anything to
//! release. [`SingleAssignmentSubscription`] covers that window.

use crate::error::{Result, SubscriptionError};
use rxrust::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

enum Slot {
    Empty,
    Assigned(BoxSubscription<'static>),
    Released { assigned: bool },
}

/// Assign-once, release-once subscription handle.
///
/// Clones share the slot. Releasing before assignment releases the
/// subscription as soon as it is assigned.
#[derive(Clone)]
pub struct SingleAssignmentSubscription {
    slot: Rc<RefCell<Slot>>,
}

impl SingleAssignmentSubscription {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::Empty)),
        }
    }

    /// Assign the underlying subscription.
    ///
    /// Fails if a subscription was assigned before; the rejected one is left
    /// untouched.
    pub fn set<S>(&self, subscription: S) -> Result<()>
    where
        S: Subscription + 'static,
    {
        let mut slot = self.slot.borrow_mut();
        match *slot {
            Slot::Empty => {
                *slot = Slot::Assigned(BoxSubscription::new(subscription));
                Ok(())
            }
            Slot::Released { assigned: false } => {
                *slot = Slot::Released { assigned: true };
                drop(slot);
                subscription.unsubscribe();
                Ok(())
            }
            Slot::Assigned(_) | Slot::Released { assigned: true } => {
                Err(SubscriptionError::AlreadyAssigned)
            }
        }
    }

    pub fn is_released(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Released { .. })
    }
}

impl Default for SingleAssignmentSubscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscription for SingleAssignmentSubscription {
    fn unsubscribe(self) {
        let released = {
            let mut slot = self.slot.borrow_mut();
            match std::mem::replace(&mut *slot, Slot::Released { assigned: false }) {
                Slot::Empty => None,
                Slot::Assigned(subscription) => {
                    *slot = Slot::Released { assigned: true };
                    Some(subscription)
                }
                released @ Slot::Released { .. } => {
                    *slot = released;
                    None
                }
            }
        };

        // Released outside the borrow: teardown may reach back into this handle.
        if let Some(subscription) = released {
            subscription.unsubscribe();
        }
    }

    fn is_closed(&self) -> bool {
        match &*self.slot.borrow() {
            Slot::Empty => false,
            Slot::Assigned(subscription) => subscription.is_closed(),
            Slot::Released { .. } => true,
        }
    }
}
