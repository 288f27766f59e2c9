// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Machinery shared by bound and floating resource streams.
//!
//! A stream owns a [`SubscriberSet`], attaches to its sources while the set is
//! non-empty, and hands out [`Subscription`] guards.
//!
//! Delivery is "drain, then deliver": a change raised while a stream is still
//! delivering is recorded and delivered once the current delivery has reached
//! every subscriber, recomputed from the latest state. Intermediate states are
//! coalesced.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::error::{ConvertError, ResourceError};
use crate::host::ResourceHost;
use crate::key::ResourceKey;
use crate::lookup::resolve_resource;
use crate::notify::ListenerId;
use crate::value::Resource;

/// What a resource stream delivers to its subscribers.
pub type StreamItem = Result<Resource, ResourceError>;

/// Transforms a resolved resource before it is delivered.
///
/// Converters see every resolved value, including [`Resource::Unset`].
pub type Converter = Rc<dyn Fn(Resource) -> Result<Resource, ConvertError>>;

type Observer = Rc<RefCell<dyn FnMut(StreamItem)>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SubscriberId(u64);

/// Ordered subscribers of one stream.
#[derive(Default)]
pub(crate) struct SubscriberSet {
    entries: RefCell<Vec<(SubscriberId, Observer)>>,
    next_id: Cell<u64>,
    delivering: Cell<bool>,
    pending: Cell<bool>,
}

impl SubscriberSet {
    /// Adds an observer. The flag is `true` if the set was empty before.
    pub(crate) fn insert(&self, observer: impl FnMut(StreamItem) + 'static) -> (SubscriberId, bool) {
        let id = SubscriberId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let mut entries = self.entries.borrow_mut();
        let first = entries.is_empty();
        let observer: Observer = Rc::new(RefCell::new(observer));
        entries.push((id, observer));
        (id, first)
    }

    /// Removes an observer. Returns `true` if this emptied the set.
    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(existing, _)| *existing == id) {
            Some(idx) => {
                entries.remove(idx);
                entries.is_empty()
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Delivers the current value to a single new subscriber.
    pub(crate) fn replay(&self, id: SubscriberId, compute: impl Fn() -> Option<StreamItem>) {
        self.deliver(Some(id), &compute);
    }

    /// Delivers the current value to every subscriber.
    pub(crate) fn publish(&self, compute: impl Fn() -> Option<StreamItem>) {
        self.deliver(None, &compute);
    }

    fn deliver(&self, target: Option<SubscriberId>, compute: &dyn Fn() -> Option<StreamItem>) {
        if self.delivering.get() {
            match target {
                // A subscriber added mid-delivery still gets its value now.
                Some(id) => self.send_to(id, compute),
                None => self.pending.set(true),
            }
            return;
        }

        let _guard = DeliveryGuard::enter(&self.delivering);
        let mut target = target;
        loop {
            self.pending.set(false);
            match target.take() {
                Some(id) => self.send_to(id, compute),
                None => self.send_all(compute),
            }
            if !self.pending.get() {
                break;
            }
        }
    }

    fn send_to(&self, id: SubscriberId, compute: &dyn Fn() -> Option<StreamItem>) {
        let Some(observer) = self.observer(id) else {
            return;
        };
        if let Some(item) = compute() {
            (&mut *observer.borrow_mut())(item);
        }
    }

    fn send_all(&self, compute: &dyn Fn() -> Option<StreamItem>) {
        let Some(item) = compute() else {
            return;
        };
        let ids: SmallVec<[SubscriberId; 4]> =
            self.entries.borrow().iter().map(|(id, _)| *id).collect();
        for id in ids {
            // Skip subscribers removed by an earlier handler.
            if let Some(observer) = self.observer(id) {
                (&mut *observer.borrow_mut())(item.clone());
            }
        }
    }

    fn observer(&self, id: SubscriberId) -> Option<Observer> {
        self.entries
            .borrow()
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, observer)| Rc::clone(observer))
    }
}

struct DeliveryGuard<'a>(&'a Cell<bool>);

impl<'a> DeliveryGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Listener registrations a stream holds on one host.
#[derive(Debug)]
pub(crate) struct HostAttachment {
    resources: ListenerId,
    theme: Option<ListenerId>,
}

impl HostAttachment {
    /// Attaches `on_change` to the host's resource notification and, if the
    /// host has a theme facet, to its theme notification.
    pub(crate) fn attach(host: &dyn ResourceHost, on_change: impl Fn() + Clone + 'static) -> Self {
        let resources = host.resources_changed().add_listener(on_change.clone());
        let theme = host
            .theme_facet()
            .map(|facet| facet.theme_changed().add_listener(on_change));
        Self { resources, theme }
    }

    pub(crate) fn detach(self, host: &dyn ResourceHost) {
        host.resources_changed().remove_listener(self.resources);
        if let Some(id) = self.theme
            && let Some(facet) = host.theme_facet()
        {
            facet.theme_changed().remove_listener(id);
        }
    }
}

/// Resolves `key` at `host` and applies the converter.
pub(crate) fn resolve_item(
    host: &dyn ResourceHost,
    key: &ResourceKey,
    converter: Option<&Converter>,
) -> StreamItem {
    let value = resolve_resource(host, key)?;
    match converter {
        None => Ok(value),
        Some(convert) => convert(value).map_err(|source| {
            tracing::warn!(resource.key = %key, error = %source, "resource converter failed");
            ResourceError::ConverterFailure {
                key: key.clone(),
                source,
            }
        }),
    }
}

pub(crate) trait Unsubscribe {
    fn unsubscribe(&self, id: SubscriberId);
}

/// An active subscription to a resource stream.
///
/// Dropping the guard (or calling [`Subscription::unsubscribe`]) removes the
/// subscriber. Removing a stream's last subscriber releases the stream's
/// notification registrations. The guard keeps its stream alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    source: Option<Rc<dyn Unsubscribe>>,
    id: SubscriberId,
}

impl Subscription {
    pub(crate) fn new(source: Rc<dyn Unsubscribe>, id: SubscriberId) -> Self {
        Self {
            source: Some(source),
            id,
        }
    }

    /// Removes the subscriber now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(source) = self.source.take() {
            source.unsubscribe(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id.0)
            .finish_non_exhaustive()
    }
}
