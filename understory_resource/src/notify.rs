// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification sources.
//!
//! Every notification a resource stream can attach to is a [`Notifier`]
//! owned by the node or provider that raises it. Streams hold the
//! [`ListenerId`] they were given and remove themselves on deactivation.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

/// Identifier of a listener registered with a [`Notifier`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A single-threaded observer registry for one kind of change.
///
/// Listeners run in registration order. [`Notifier::notify`] works on a
/// snapshot of the registry, so a listener may add or remove listeners
/// (including itself) while a notification is being delivered; such changes
/// take effect from the next notification.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_resource::Notifier;
///
/// let notifier = Notifier::new();
/// let hits = Rc::new(Cell::new(0));
/// let id = notifier.add_listener({
///     let hits = hits.clone();
///     move || hits.set(hits.get() + 1)
/// });
///
/// notifier.notify();
/// assert!(notifier.remove_listener(id));
/// notifier.notify();
/// assert_eq!(hits.get(), 1);
/// ```
#[derive(Default)]
pub struct Notifier {
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
    next_id: Cell<u64>,
}

impl Notifier {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its id.
    pub fn add_listener(&self, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener.
    ///
    /// Returns `false` if `id` was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|(existing, _)| *existing == id) {
            Some(idx) => {
                listeners.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Calls every registered listener in registration order.
    pub fn notify(&self) {
        let snapshot: SmallVec<[Rc<dyn Fn()>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listener_count())
            .finish_non_exhaustive()
    }
}
