//! Ordered observer lists with handle-based unsubscription

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle returned when subscribing; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A list of callbacks invoked in registration order.
///
/// Ids increase monotonically, so iterating the backing map by key yields
/// registration order even after unsubscriptions. Callbacks are handed out
/// as a snapshot, which lets a callback subscribe or unsubscribe while the
/// list is being walked; the change applies from the next walk.
pub struct Observers<F: ?Sized> {
    entries: RefCell<BTreeMap<SubscriptionId, Rc<F>>>,
    next_id: Cell<u64>,
}

impl<F: ?Sized> Observers<F> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, callback: Rc<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().insert(id, callback);
        id
    }

    /// Returns `false` if the id was unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.entries.borrow_mut().remove(&id).is_some()
    }

    /// Callbacks in registration order.
    pub fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries.borrow().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<F: ?Sized> Default for Observers<F> {
    fn default() -> Self {
        Self::new()
    }
}
